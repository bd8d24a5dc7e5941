//! # Combined Report
//!
//! A "full" optimization request also runs spike detection over the
//! identical price snapshot, so both halves of the report reflect the
//! same data pull.

use serde::Serialize;

use super::sharpe::optimize_sharpe;
use super::types::OptimizationResult;
use super::types::OptimizeError;
use crate::market::PriceFrame;
use crate::volatility::compute_volatility_signals;
use crate::volatility::SpikeConfig;
use crate::volatility::VolatilityReport;

/// Optimization plus the volatility snapshot it was computed against.
#[derive(Clone, Debug, Serialize)]
pub struct PortfolioReport {
  pub optimization: OptimizationResult,
  pub volatility: VolatilityReport,
}

/// Optimize over a price snapshot and attach its volatility signals.
///
/// Rows with any missing return are dropped before the solve (the
/// optimizer requires a dense matrix); spike detection sees the raw
/// frame and degrades per-ticker on its own.
pub fn analyze_portfolio(
  frame: &PriceFrame,
  risk_free: f64,
  spike_config: &SpikeConfig,
) -> Result<PortfolioReport, OptimizeError> {
  let returns = frame.simple_returns().drop_incomplete_rows();
  let optimization = optimize_sharpe(&returns, risk_free)?;
  let volatility = compute_volatility_signals(frame, spike_config);

  Ok(PortfolioReport {
    optimization,
    volatility,
  })
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use chrono::NaiveDate;
  use ndarray::Array2;

  use super::*;
  use crate::market::PriceFrame;

  fn two_ticker_frame(n: usize) -> PriceFrame {
    let start = NaiveDate::from_ymd_opt(2022, 1, 3).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
      .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
      .collect();

    let mut closes = Array2::zeros((n, 2));
    let mut pa = 100.0;
    let mut pb = 40.0;
    for t in 0..n {
      // Deterministic, offset oscillations with mild drift.
      pa *= 1.0 + 0.0006 + 0.011 * if t % 2 == 0 { 1.0 } else { -1.0 };
      pb *= 1.0 + 0.0004 + 0.007 * if t % 3 == 0 { 1.0 } else { -0.5 };
      closes[[t, 0]] = pa;
      closes[[t, 1]] = pb;
    }

    PriceFrame::new(dates, vec!["AAA".into(), "BBB".into()], closes).unwrap()
  }

  #[test]
  fn report_carries_both_analyses_from_one_snapshot() {
    let frame = two_ticker_frame(150);
    let report = analyze_portfolio(&frame, 0.0, &SpikeConfig::default()).unwrap();

    assert_eq!(report.optimization.tickers, vec!["AAA", "BBB"]);
    let sum: f64 = report.optimization.weights.values().sum();
    assert!((sum - 1.0).abs() < 1e-6);

    assert_eq!(report.volatility.signals.len(), 2);
    assert!(report.volatility.signals.iter().all(|s| s.vol120.is_some()));
  }

  #[test]
  fn empty_snapshot_fails_the_optimization_half() {
    let result = analyze_portfolio(&PriceFrame::empty(), 0.0, &SpikeConfig::default());
    assert!(matches!(result, Err(OptimizeError::EmptyUniverse)));
  }
}
