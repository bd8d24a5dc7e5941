//! # Spike Detection
//!
//! $$
//! \text{spike} \iff \sigma_{20} > 1.5\,\sigma_{120}
//! $$
//!
//! Trailing short/long-window annualized volatility per ticker, with an
//! aggregate portfolio risk alert.

use serde::Serialize;

use super::Direction;
use crate::market::PriceFrame;
use crate::stats::compound_return;
use crate::stats::round_dp;
use crate::stats::sample_std;

/// Rolling-window configuration for spike detection.
#[derive(Clone, Copy, Debug)]
pub struct SpikeConfig {
  /// Short trailing window, in return observations.
  pub short_window: usize,
  /// Long trailing window, in return observations.
  pub long_window: usize,
  /// Daily-to-annual volatility scaling.
  pub annualization: f64,
  /// Short/long ratio above which a spike is flagged.
  pub spike_multiplier: f64,
}

impl Default for SpikeConfig {
  fn default() -> Self {
    Self {
      short_window: 20,
      long_window: 120,
      annualization: 252f64.sqrt(),
      spike_multiplier: 1.5,
    }
  }
}

/// Per-ticker volatility signal. A window with missing data reports
/// `None` for that statistic only.
#[derive(Clone, Debug, Serialize)]
pub struct VolatilitySignal {
  pub ticker: String,
  pub vol20: Option<f64>,
  pub vol120: Option<f64>,
  pub spike: bool,
  pub spike_direction: Option<Direction>,
}

/// Signals for every ticker in the frame plus the aggregate alert.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VolatilityReport {
  pub signals: Vec<VolatilitySignal>,
  pub spike_tickers: Vec<String>,
  pub risk_alert: Option<String>,
}

/// Detect volatility spikes over the most recent windows of a price
/// frame. An empty frame yields an empty report, never an error.
pub fn compute_volatility_signals(frame: &PriceFrame, config: &SpikeConfig) -> VolatilityReport {
  let returns = frame.simple_returns();
  if returns.n_obs() == 0 {
    return VolatilityReport::default();
  }

  let mut signals = Vec::with_capacity(frame.tickers.len());
  let mut spike_tickers = Vec::new();

  for (j, ticker) in frame.tickers.iter().enumerate() {
    let short = returns.trailing_window(j, config.short_window);
    let long = returns.trailing_window(j, config.long_window);

    let raw_short = short.as_deref().map(|w| sample_std(w) * config.annualization);
    let raw_long = long.as_deref().map(|w| sample_std(w) * config.annualization);

    let spike = match (raw_short, raw_long) {
      (Some(v20), Some(v120)) => {
        v20.is_finite() && v120.is_finite() && v20 > config.spike_multiplier * v120
      }
      _ => false,
    };

    let vol20 = raw_short.map(|v| round_dp(v, 6));
    let vol120 = raw_long.map(|v| round_dp(v, 6));

    let spike_direction = if spike {
      short.as_deref().map(|w| {
        if compound_return(w) >= 0.0 {
          Direction::Up
        } else {
          Direction::Down
        }
      })
    } else {
      None
    };

    if spike {
      spike_tickers.push(ticker.clone());
    }

    signals.push(VolatilitySignal {
      ticker: ticker.clone(),
      vol20,
      vol120,
      spike,
      spike_direction,
    });
  }

  let risk_alert = if spike_tickers.is_empty() {
    None
  } else {
    Some(format!(
      "Volatility spike in {}; portfolio risk elevated.",
      spike_tickers.join(", ")
    ))
  };

  VolatilityReport {
    signals,
    spike_tickers,
    risk_alert,
  }
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use chrono::NaiveDate;
  use ndarray::Array2;

  use super::*;
  use crate::market::PriceFrame;

  fn frame_from_returns(returns_by_ticker: &[(&str, Vec<f64>)]) -> PriceFrame {
    let n = returns_by_ticker[0].1.len() + 1;
    let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
      .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
      .collect();

    let k = returns_by_ticker.len();
    let mut closes = Array2::zeros((n, k));
    for (j, (_, rets)) in returns_by_ticker.iter().enumerate() {
      let mut price = 100.0;
      closes[[0, j]] = price;
      for (i, r) in rets.iter().enumerate() {
        price *= 1.0 + r;
        closes[[i + 1, j]] = price;
      }
    }

    PriceFrame::new(
      dates,
      returns_by_ticker.iter().map(|(t, _)| t.to_string()).collect(),
      closes,
    )
    .unwrap()
  }

  #[test]
  fn flat_then_volatile_series_spikes_upward() {
    // 100 near-flat returns, then 20 high-variance ones with a positive
    // drift: vol20 well above 1.5 × vol120.
    let mut rets = Vec::new();
    for i in 0..100 {
      rets.push(if i % 2 == 0 { 0.001 } else { -0.001 });
    }
    for i in 0..20 {
      rets.push(if i % 2 == 0 { 0.06 } else { -0.04 });
    }

    let frame = frame_from_returns(&[("SPIKY", rets)]);
    let report = compute_volatility_signals(&frame, &SpikeConfig::default());

    let sig = &report.signals[0];
    let (v20, v120) = (sig.vol20.unwrap(), sig.vol120.unwrap());
    assert!(v20 > 1.5 * v120, "v20={v20} v120={v120}");
    assert!(sig.spike);
    assert_eq!(sig.spike_direction, Some(Direction::Up));
    assert_eq!(report.spike_tickers, vec!["SPIKY".to_string()]);
    assert_eq!(
      report.risk_alert.as_deref(),
      Some("Volatility spike in SPIKY; portfolio risk elevated.")
    );
  }

  #[test]
  fn downward_drift_reports_down_direction() {
    let mut rets = Vec::new();
    for i in 0..100 {
      rets.push(if i % 2 == 0 { 0.001 } else { -0.001 });
    }
    for i in 0..20 {
      rets.push(if i % 2 == 0 { 0.04 } else { -0.06 });
    }

    let frame = frame_from_returns(&[("DROPPY", rets)]);
    let report = compute_volatility_signals(&frame, &SpikeConfig::default());
    assert_eq!(report.signals[0].spike_direction, Some(Direction::Down));
  }

  #[test]
  fn short_history_reports_null_long_vol() {
    let rets: Vec<f64> = (0..40).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
    let frame = frame_from_returns(&[("SHORT", rets)]);
    let report = compute_volatility_signals(&frame, &SpikeConfig::default());

    let sig = &report.signals[0];
    assert!(sig.vol20.is_some());
    assert!(sig.vol120.is_none());
    assert!(!sig.spike);
    assert!(sig.spike_direction.is_none());
    assert!(report.risk_alert.is_none());
  }

  #[test]
  fn steady_series_does_not_spike() {
    let rets: Vec<f64> = (0..130).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
    let frame = frame_from_returns(&[("CALM", rets)]);
    let report = compute_volatility_signals(&frame, &SpikeConfig::default());

    assert!(!report.signals[0].spike);
    assert!(report.spike_tickers.is_empty());
  }

  #[test]
  fn empty_frame_yields_empty_report() {
    let report = compute_volatility_signals(&PriceFrame::empty(), &SpikeConfig::default());
    assert!(report.signals.is_empty());
    assert!(report.risk_alert.is_none());
  }

  #[test]
  fn gap_inside_window_nulls_that_statistic() {
    let rets: Vec<f64> = (0..130).map(|i| if i % 2 == 0 { 0.01 } else { -0.01 }).collect();
    let mut frame = frame_from_returns(&[("GAPPY", rets)]);
    // Poke a hole near the end: inside the short window.
    let n = frame.dates.len();
    frame.closes[[n - 5, 0]] = f64::NAN;

    let report = compute_volatility_signals(&frame, &SpikeConfig::default());
    let sig = &report.signals[0];
    assert!(sig.vol20.is_none());
    assert!(sig.vol120.is_none());
  }
}
