//! # Volatility
//!
//! $$
//! \sigma_{ann} = \sigma_{daily}\sqrt{252}
//! $$
//!
//! Rolling volatility spike detection and seasonal monthly pattern mining.

use std::fmt::Display;

use serde::Serialize;

pub mod seasonal;
pub mod spike;

pub use seasonal::compute_monthly_spike_patterns;
pub use seasonal::MonthlySpike;
pub use seasonal::SeasonalConfig;
pub use spike::compute_volatility_signals;
pub use spike::SpikeConfig;
pub use spike::VolatilityReport;
pub use spike::VolatilitySignal;

/// Sign of a detected move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  Up,
  Down,
}

impl Display for Direction {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Direction::Up => write!(f, "up"),
      Direction::Down => write!(f, "down"),
    }
  }
}

pub(crate) const MONTH_NAMES: [&str; 12] = [
  "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
