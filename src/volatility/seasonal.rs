//! # Seasonal Patterns
//!
//! $$
//! \bar r_{m} = \frac{1}{n_m}\sum_{t:\ \text{month}(t)=m} r_t
//! $$
//!
//! Mines calendar months where a ticker historically tends to move,
//! after excluding months where most of the universe moved together
//! (market-wide events rather than ticker-specific behavior).

use std::collections::HashMap;

use chrono::Datelike;
use serde::Serialize;
use tracing::debug;

use super::Direction;
use super::MONTH_NAMES;
use crate::market::PriceFrame;
use crate::stats::round_dp;

/// Thresholds for the seasonal miner.
#[derive(Clone, Copy, Debug)]
pub struct SeasonalConfig {
  /// Minimum monthly return rows overall before any mining happens.
  pub min_total_months: usize,
  /// Minimum non-missing observations per ticker.
  pub min_ticker_months: usize,
  /// Absolute monthly move counted as "big" for macro detection.
  pub macro_move: f64,
  /// Fraction of reporting tickers moving together that marks a macro month.
  pub macro_fraction: f64,
  /// Minimum absolute mean monthly return for a candidate month.
  pub min_mean_move: f64,
  /// Maximum number of reported months per ticker.
  pub max_patterns: usize,
}

impl Default for SeasonalConfig {
  fn default() -> Self {
    Self {
      min_total_months: 6,
      min_ticker_months: 4,
      macro_move: 0.03,
      macro_fraction: 0.6,
      min_mean_move: 0.02,
      max_patterns: 4,
    }
  }
}

/// A calendar month where a ticker historically spikes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySpike {
  pub month: &'static str,
  pub direction: Direction,
  /// Mean monthly return × 100, rounded to one decimal.
  pub avg_pct: f64,
}

/// Mine per-ticker monthly spike patterns from a multi-year price frame.
///
/// The requested `universe` drives macro filtering (active only when it
/// holds at least three tickers) and guarantees every requested ticker
/// appears in the result, with an empty list when the frame has no or
/// not enough data for it.
pub fn compute_monthly_spike_patterns(
  frame: &PriceFrame,
  universe: &[String],
  config: &SeasonalConfig,
) -> HashMap<String, Vec<MonthlySpike>> {
  let mut result: HashMap<String, Vec<MonthlySpike>> = universe
    .iter()
    .map(|t| (t.clone(), Vec::new()))
    .collect();

  if frame.is_empty() {
    return result;
  }

  let monthly = frame.month_end().simple_returns();
  if monthly.n_obs() < config.min_total_months {
    return result;
  }

  let is_macro = macro_event_months(&monthly.returns, universe.len(), config);
  let excluded = is_macro.iter().filter(|&&m| m).count();
  if excluded > 0 {
    debug!(excluded, "excluding market-wide event months from seasonal statistics");
  }

  for ticker in universe {
    let Some(j) = monthly.tickers.iter().position(|t| t == ticker) else {
      continue;
    };

    let mut observations: Vec<(u32, f64)> = Vec::new();
    for t in 0..monthly.n_obs() {
      let r = monthly.returns[[t, j]];
      if !is_macro[t] && r.is_finite() {
        observations.push((monthly.dates[t].month(), r));
      }
    }

    if observations.len() < config.min_ticker_months {
      continue;
    }

    let mut sums = [0.0f64; 12];
    let mut counts = [0usize; 12];
    for (month, r) in &observations {
      sums[(*month - 1) as usize] += r;
      counts[(*month - 1) as usize] += 1;
    }

    let mut candidates: Vec<(u32, MonthlySpike)> = Vec::new();
    for m in 0..12 {
      if counts[m] < 2 {
        continue;
      }
      let mean = sums[m] / counts[m] as f64;
      if mean.abs() > config.min_mean_move {
        candidates.push((
          (m + 1) as u32,
          MonthlySpike {
            month: MONTH_NAMES[m],
            direction: if mean > 0.0 {
              Direction::Up
            } else {
              Direction::Down
            },
            avg_pct: round_dp(mean * 100.0, 1),
          },
        ));
      }
    }

    // Strongest months first; equal strengths resolve to the earlier
    // calendar month so output is reproducible.
    candidates.sort_by(|(ma, a), (mb, b)| {
      b.avg_pct
        .abs()
        .partial_cmp(&a.avg_pct.abs())
        .unwrap_or(std::cmp::Ordering::Equal)
        .then(ma.cmp(mb))
    });
    candidates.truncate(config.max_patterns);

    result.insert(
      ticker.clone(),
      candidates.into_iter().map(|(_, s)| s).collect(),
    );
  }

  result
}

/// Flag monthly rows where a supermajority of reporting tickers made the
/// same big move. Skipped entirely for universes smaller than three and
/// for months with too few reporters to call.
fn macro_event_months(
  returns: &ndarray::Array2<f64>,
  universe_size: usize,
  config: &SeasonalConfig,
) -> Vec<bool> {
  let n_obs = returns.nrows();
  let mut flags = vec![false; n_obs];
  if universe_size < 3 {
    return flags;
  }

  let min_reporting = 3f64.max(0.5 * universe_size as f64);
  for t in 0..n_obs {
    let reporting: Vec<f64> = returns.row(t).iter().copied().filter(|r| r.is_finite()).collect();
    if (reporting.len() as f64) < min_reporting {
      continue;
    }

    let total = reporting.len() as f64;
    let big_up = reporting.iter().filter(|&&r| r > config.macro_move).count() as f64 / total;
    let big_down = reporting.iter().filter(|&&r| r < -config.macro_move).count() as f64 / total;

    if big_up > config.macro_fraction || big_down > config.macro_fraction {
      flags[t] = true;
    }
  }

  flags
}
