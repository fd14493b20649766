//! Macro trivia shown at startup.

use rand::Rng;
use rand::seq::SliceRandom;

/// The trivia pool.
pub const FUN_FACTS: [&str; 5] = [
    "📉 S&P 500 hit circuit breakers 4 times in 10 days (March 2020).",
    "💸 Zimbabwe had 100 trillion dollar notes in 2008.",
    "🛢️ In 2021, energy stocks outperformed tech.",
    "🔁 Yield curve inversions preceded every U.S. recession since 1960s.",
    "📈 Tesla’s valuation once topped the 10 largest automakers combined.",
];

/// Pick one fact uniformly at random.
pub fn random_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    FUN_FACTS.choose(rng).copied().unwrap_or(FUN_FACTS[0])
}
