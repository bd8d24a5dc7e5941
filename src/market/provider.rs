//! # Providers
//!
//! External price-fetch seam. The analytics consume already-materialized
//! frames; fetch timeouts, retries and cancellation belong to the
//! implementor, not to this crate.

use std::collections::HashMap;
use std::fmt::Display;

use anyhow::Result;
use ndarray::Array2;

use super::frame::PriceFrame;

/// Historical data window requested from a provider.
#[derive(Default, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Period {
  /// Trailing year.
  OneYear,
  /// Trailing two years.
  #[default]
  TwoYears,
  /// Trailing five years.
  FiveYears,
}

impl Display for Period {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Period::OneYear => write!(f, "1y"),
      Period::TwoYears => write!(f, "2y"),
      Period::FiveYears => write!(f, "5y"),
    }
  }
}

/// Source of date-indexed close prices.
///
/// Implementations may return a strict subset of the requested tickers
/// (unresolved symbols are dropped, not an error) and may return an
/// empty frame when no data exists for the period.
pub trait PriceSeriesProvider {
  fn fetch_prices(&self, tickers: &[String], period: Period) -> Result<PriceFrame>;
}

/// In-memory provider backed by pre-built frames, one per period.
/// Used in tests and demos in place of a live market-data client.
#[derive(Clone, Debug, Default)]
pub struct StaticPriceProvider {
  frames: HashMap<Period, PriceFrame>,
}

impl StaticPriceProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register the frame served for a period.
  pub fn insert(&mut self, period: Period, frame: PriceFrame) {
    self.frames.insert(period, frame);
  }
}

impl PriceSeriesProvider for StaticPriceProvider {
  fn fetch_prices(&self, tickers: &[String], period: Period) -> Result<PriceFrame> {
    let Some(frame) = self.frames.get(&period) else {
      return Ok(PriceFrame::empty());
    };

    // Requested order is preserved; unknown symbols are dropped.
    let available: Vec<(String, usize)> = tickers
      .iter()
      .filter_map(|t| frame.ticker_index(t).map(|j| (t.clone(), j)))
      .collect();

    let n = frame.dates.len();
    let mut closes = Array2::from_elem((n, available.len()), f64::NAN);
    for (out_j, (_, src_j)) in available.iter().enumerate() {
      for t in 0..n {
        closes[[t, out_j]] = frame.closes[[t, *src_j]];
      }
    }

    PriceFrame::new(
      frame.dates.clone(),
      available.into_iter().map(|(t, _)| t).collect(),
      closes,
    )
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use ndarray::array;

  use super::*;

  #[test]
  fn static_provider_returns_requested_subset_in_order() {
    let frame = PriceFrame::new(
      vec![NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()],
      vec!["AAA".into(), "BBB".into(), "CCC".into()],
      array![[1.0, 2.0, 3.0]],
    )
    .unwrap();

    let mut provider = StaticPriceProvider::new();
    provider.insert(Period::OneYear, frame);

    let got = provider
      .fetch_prices(
        &["CCC".into(), "ZZZ".into(), "AAA".into()],
        Period::OneYear,
      )
      .unwrap();

    assert_eq!(got.tickers, vec!["CCC".to_string(), "AAA".to_string()]);
    assert_eq!(got.closes[[0, 0]], 3.0);
    assert_eq!(got.closes[[0, 1]], 1.0);
  }

  #[test]
  fn missing_period_yields_empty_frame() {
    let provider = StaticPriceProvider::new();
    let got = provider
      .fetch_prices(&["AAA".into()], Period::FiveYears)
      .unwrap();
    assert!(got.is_empty());
  }
}
