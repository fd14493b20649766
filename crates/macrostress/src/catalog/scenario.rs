//! Historical macro stress scenarios.

use chrono::NaiveDate;
use macrostress_data::DateWindow;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid scenario date"),
    }
}

/// A named historical window of macro stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scenario {
    /// Fed tightening after the post-crisis zero-rate period
    RateHikeCycle,

    /// Pandemic selloff and rebound
    CovidShock,

    /// Post-pandemic inflation surge
    InflationSpike,

    /// Regional bank collapses
    BankFailures,
}

impl Scenario {
    /// Returns all scenarios in catalog order.
    pub fn all() -> Vec<Self> {
        vec![
            Self::RateHikeCycle,
            Self::CovidShock,
            Self::InflationSpike,
            Self::BankFailures,
        ]
    }

    /// Display label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::RateHikeCycle => "Rate Hike Cycle (2015–2018)",
            Self::CovidShock => "COVID Shock (Feb–Mar 2020)",
            Self::InflationSpike => "Inflation Spike (2021–2022)",
            Self::BankFailures => "Bank Failures (Mar 2023)",
        }
    }

    /// Short command-line key.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::RateHikeCycle => "rate-hikes",
            Self::CovidShock => "covid",
            Self::InflationSpike => "inflation",
            Self::BankFailures => "bank-failures",
        }
    }

    /// First day of the window.
    pub const fn start(&self) -> NaiveDate {
        match self {
            Self::RateHikeCycle => ymd(2015, 12, 1),
            Self::CovidShock => ymd(2020, 2, 1),
            Self::InflationSpike => ymd(2021, 1, 1),
            Self::BankFailures => ymd(2023, 3, 1),
        }
    }

    /// Last day of the window.
    pub const fn end(&self) -> NaiveDate {
        match self {
            Self::RateHikeCycle => ymd(2018, 12, 31),
            Self::CovidShock => ymd(2020, 4, 30),
            Self::InflationSpike => ymd(2022, 12, 31),
            Self::BankFailures => ymd(2023, 4, 30),
        }
    }

    /// Inclusive date window.
    pub fn window(&self) -> DateWindow {
        DateWindow::spanning(self.start(), self.end())
    }

    /// What happened.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::RateHikeCycle => "The Fed gradually increased rates after the 2008 crisis.",
            Self::CovidShock => "A sharp selloff triggered by the global pandemic.",
            Self::InflationSpike => "Post-COVID demand surge and stimulus led to high inflation.",
            Self::BankFailures => "Regional banks collapsed due to duration risk.",
        }
    }

    /// Investor takeaway.
    pub const fn insight(&self) -> &'static str {
        match self {
            Self::RateHikeCycle => "Financials often benefit from rising rates.",
            Self::CovidShock => "Tech and healthcare rebounded quickly.",
            Self::InflationSpike => "Energy performed well; growth stocks struggled.",
            Self::BankFailures => "Tech & treasuries rallied while banks dropped.",
        }
    }

    /// Look up by 1-based catalog position.
    pub fn from_index(index: usize) -> Option<Self> {
        index
            .checked_sub(1)
            .and_then(|i| Self::all().get(i).copied())
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Scenario {
    type Err = String;

    /// Accepts a 1-based index, the short key, or the full label (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(index) = s.parse::<usize>() {
            return Self::from_index(index).ok_or_else(|| {
                format!("no scenario #{index} (choose 1-{})", Self::all().len())
            });
        }
        Self::all()
            .into_iter()
            .find(|sc| sc.key().eq_ignore_ascii_case(s) || sc.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::all().iter().map(Self::key).collect();
                format!("unknown scenario '{s}' (expected one of: {})", keys.join(", "))
            })
    }
}
