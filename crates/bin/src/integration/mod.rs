//! Glue between the command line and the dashboard workflows.
//!
//! Provider construction, argument parsing helpers and output rendering.

pub(crate) mod providers;
pub(crate) mod render;
pub(crate) mod weights;
