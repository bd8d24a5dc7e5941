//! # Sharpe Solver
//!
//! $$
//! S(\mathbf{w}) = \frac{252\,\mu^\top\mathbf{w}-r_f}
//! {\sqrt{252\,\mathbf{w}^\top\Sigma\mathbf{w}}}
//! $$
//!
//! Long-only, fully-invested Sharpe maximization. The simplex
//! constraints (0 ≤ wᵢ ≤ 1, Σw = 1) hold exactly under a softmax
//! reparameterization, so the solve itself runs unconstrained with
//! L-BFGS and an analytic gradient chained through the softmax Jacobian.

use argmin::core::CostFunction;
use argmin::core::Executor;
use argmin::core::Gradient;
use argmin::core::State;
use argmin::core::TerminationReason;
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::quasinewton::LBFGS;
use tracing::warn;

use super::types::OptimizationResult;
use super::types::OptimizeError;
use crate::market::ReturnFrame;
use crate::stats::condition_number;
use crate::stats::covariance_matrix;
use crate::stats::mean_vector;
use crate::stats::round_dp;

const TRADING_DAYS: f64 = 252.0;
const COST_TOL: f64 = 1e-9;
const MAX_ITERS: u64 = 1000;
const LBFGS_MEMORY: usize = 7;
/// Condition number above which the covariance is treated as degenerate.
const COND_LIMIT: f64 = 1e10;
/// Ridge size relative to the mean diagonal variance.
const RIDGE_SCALE: f64 = 1e-8;
/// Gradient norm below which the current point already solves the problem.
const STATIONARY_TOL: f64 = 1e-10;

fn softmax(x: &[f64]) -> Vec<f64> {
  if x.is_empty() {
    return Vec::new();
  }

  let max_x = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
  let exps: Vec<f64> = x.iter().map(|&v| (v - max_x).exp()).collect();
  let sum: f64 = exps.iter().sum();

  if sum < 1e-15 {
    vec![1.0 / x.len() as f64; x.len()]
  } else {
    exps.iter().map(|&e| e / sum).collect()
  }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
  a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

fn mat_vec_mul(mat: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
  mat
    .iter()
    .map(|row| row.iter().zip(v.iter()).map(|(a, b)| a * b).sum())
    .collect()
}

/// Problem definition for argmin: minimize the negative Sharpe ratio
/// over the softmax pre-image of the weight simplex.
#[derive(Clone)]
struct SharpeProblem {
  mu_annual: Vec<f64>,
  cov_annual: Vec<Vec<f64>>,
  risk_free: f64,
}

impl CostFunction for SharpeProblem {
  type Param = Vec<f64>;
  type Output = f64;

  fn cost(&self, x: &Self::Param) -> Result<Self::Output, argmin::core::Error> {
    let w = softmax(x);
    let excess = dot(&self.mu_annual, &w) - self.risk_free;
    let sigma_w = mat_vec_mul(&self.cov_annual, &w);
    let variance = dot(&w, &sigma_w);

    if !variance.is_finite() || variance <= 0.0 {
      return Ok(1e12);
    }

    Ok(-excess / variance.sqrt())
  }
}

impl Gradient for SharpeProblem {
  type Param = Vec<f64>;
  type Gradient = Vec<f64>;

  fn gradient(&self, x: &Self::Param) -> Result<Self::Gradient, argmin::core::Error> {
    let w = softmax(x);
    let sigma_w = mat_vec_mul(&self.cov_annual, &w);
    let variance = dot(&w, &sigma_w);

    if !variance.is_finite() || variance <= 0.0 {
      return Ok(vec![0.0; x.len()]);
    }

    let vol = variance.sqrt();
    let excess = dot(&self.mu_annual, &w) - self.risk_free;

    // d(-S)/dw, then chained through the softmax Jacobian
    // J = diag(w) - w wᵀ.
    let g_w: Vec<f64> = (0..w.len())
      .map(|i| -(self.mu_annual[i] / vol - excess * sigma_w[i] / (vol * variance)))
      .collect();
    let g_dot_w = dot(&g_w, &w);

    Ok(
      (0..w.len())
        .map(|j| w[j] * (g_w[j] - g_dot_w))
        .collect(),
    )
  }
}

fn single_asset_result(
  ticker: &str,
  mu_daily: f64,
  var_daily: f64,
  risk_free: f64,
) -> Result<OptimizationResult, OptimizeError> {
  let annual_return = TRADING_DAYS * mu_daily;
  let annual_vol = (TRADING_DAYS * var_daily).sqrt();
  if annual_vol <= 0.0 {
    return Err(OptimizeError::DegenerateCovariance(
      "single-asset universe has zero return variance".to_string(),
    ));
  }

  let mut weights = std::collections::BTreeMap::new();
  weights.insert(ticker.to_string(), 1.0);

  Ok(OptimizationResult {
    tickers: vec![ticker.to_string()],
    weights,
    sharpe: round_dp((annual_return - risk_free) / annual_vol, 6),
    annual_return: round_dp(annual_return, 6),
    annual_vol: round_dp(annual_vol, 6),
  })
}

/// Maximize the annualized Sharpe ratio over long-only, fully-invested
/// weights.
///
/// The return matrix must be dense; gap handling is the caller's
/// responsibility. A single-ticker universe short-circuits to weight
/// 1.0 without invoking the solver. An ill-conditioned covariance is
/// regularized with an explicit, logged diagonal ridge rather than
/// silently inverted.
pub fn optimize_sharpe(
  returns: &ReturnFrame,
  risk_free: f64,
) -> Result<OptimizationResult, OptimizeError> {
  let k = returns.n_assets();
  if k == 0 {
    return Err(OptimizeError::EmptyUniverse);
  }
  if returns.returns.iter().any(|r| !r.is_finite()) {
    return Err(OptimizeError::NonFiniteReturns);
  }
  if returns.n_obs() < 2 {
    return Err(OptimizeError::DegenerateCovariance(format!(
      "{} return observation(s) cannot produce a covariance estimate",
      returns.n_obs()
    )));
  }

  let mu_daily = mean_vector(&returns.returns);
  let mut cov_daily = covariance_matrix(&returns.returns);

  if k == 1 {
    return single_asset_result(&returns.tickers[0], mu_daily[0], cov_daily[0][0], risk_free);
  }

  let cond = condition_number(&cov_daily);
  if !cond.is_finite() || cond > COND_LIMIT {
    let trace: f64 = (0..k).map(|i| cov_daily[i][i]).sum();
    let scale = trace / k as f64;
    if scale <= 0.0 {
      return Err(OptimizeError::DegenerateCovariance(
        "covariance matrix carries no variance".to_string(),
      ));
    }

    let ridge = scale * RIDGE_SCALE;
    warn!(
      condition = cond,
      ridge, "covariance matrix is ill-conditioned; applying diagonal regularization"
    );
    for i in 0..k {
      cov_daily[i][i] += ridge;
    }
  }

  let problem = SharpeProblem {
    mu_annual: mu_daily.iter().map(|m| TRADING_DAYS * m).collect(),
    cov_annual: cov_daily
      .iter()
      .map(|row| row.iter().map(|c| TRADING_DAYS * c).collect())
      .collect(),
    risk_free,
  };

  // Equal weights under softmax.
  let x0 = vec![0.0; k];

  let g0 = problem
    .gradient(&x0)
    .map_err(|e| OptimizeError::Solver(e.to_string()))?;
  let g0_norm = dot(&g0, &g0).sqrt();

  let best_x = if g0_norm < STATIONARY_TOL {
    // Equal weights are already stationary (symmetric universes); the
    // line search has no descent direction to work with.
    x0
  } else {
    let linesearch = MoreThuenteLineSearch::new()
      .with_c(1e-4, 0.9)
      .map_err(|e| OptimizeError::Solver(e.to_string()))?;
    let solver = LBFGS::new(linesearch, LBFGS_MEMORY)
      .with_tolerance_cost(COST_TOL)
      .map_err(|e| OptimizeError::Solver(e.to_string()))?;

    let res = Executor::new(problem.clone(), solver)
      .configure(|state| state.param(x0.clone()).max_iters(MAX_ITERS))
      .run()
      .map_err(|e| OptimizeError::Solver(e.to_string()))?;

    let state = res.state();
    if matches!(
      state.get_termination_reason(),
      Some(TerminationReason::MaxItersReached)
    ) {
      return Err(OptimizeError::NotConverged {
        max_iters: MAX_ITERS,
      });
    }

    state.get_best_param().cloned().unwrap_or(x0)
  };

  let w = softmax(&best_x);
  let annual_return = dot(&problem.mu_annual, &w);
  let sigma_w = mat_vec_mul(&problem.cov_annual, &w);
  let variance = dot(&w, &sigma_w);
  if !variance.is_finite() || variance <= 0.0 {
    return Err(OptimizeError::DegenerateCovariance(
      "optimal portfolio has zero volatility".to_string(),
    ));
  }
  let annual_vol = variance.sqrt();

  let weights = returns
    .tickers
    .iter()
    .zip(w.iter())
    .map(|(t, wi)| (t.clone(), round_dp(*wi, 6)))
    .collect();

  Ok(OptimizationResult {
    tickers: returns.tickers.clone(),
    weights,
    sharpe: round_dp((annual_return - risk_free) / annual_vol, 6),
    annual_return: round_dp(annual_return, 6),
    annual_vol: round_dp(annual_vol, 6),
  })
}

#[cfg(test)]
mod tests {
  use chrono::Days;
  use chrono::NaiveDate;
  use ndarray::Array2;

  use super::*;
  use crate::market::ReturnFrame;

  fn return_frame(tickers: &[&str], columns: &[Vec<f64>]) -> ReturnFrame {
    let n = columns.first().map(|c| c.len()).unwrap_or(0);
    let start = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
    let dates: Vec<NaiveDate> = (0..n)
      .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
      .collect();

    let mut returns = Array2::zeros((n, tickers.len()));
    for (j, col) in columns.iter().enumerate() {
      for (t, r) in col.iter().enumerate() {
        returns[[t, j]] = *r;
      }
    }

    ReturnFrame {
      dates,
      tickers: tickers.iter().map(|t| t.to_string()).collect(),
      returns,
    }
  }

  #[test]
  fn weights_lie_in_bounds_and_sum_to_one() {
    let frame = return_frame(
      &["AAA", "BBB", "CCC"],
      &[
        vec![0.010, -0.020, 0.015, 0.005, -0.010, 0.020, 0.001, -0.004],
        vec![0.002, 0.001, -0.001, 0.003, 0.000, 0.001, 0.002, -0.001],
        vec![-0.005, 0.010, 0.020, -0.015, 0.005, -0.005, 0.008, 0.002],
      ],
    );

    let result = optimize_sharpe(&frame, 0.0).unwrap();

    let sum: f64 = result.weights.values().sum();
    assert!((sum - 1.0).abs() < 1e-6, "weights sum to {sum}");
    for (ticker, w) in &result.weights {
      assert!((0.0..=1.0).contains(w), "{ticker} weight {w} out of bounds");
    }
    assert!(result.sharpe.is_finite());
    assert!(result.annual_vol > 0.0);
  }

  #[test]
  fn single_ticker_short_circuits_to_full_weight() {
    let frame = return_frame(&["ONLY"], &[vec![0.01, -0.01, 0.02, 0.005]]);
    let result = optimize_sharpe(&frame, 0.0).unwrap();

    assert_eq!(result.weights.len(), 1);
    assert_eq!(result.weights["ONLY"], 1.0);
  }

  #[test]
  fn hedged_pair_beats_both_single_assets() {
    // Perfectly anti-correlated, equal mean and variance: the blend
    // carries the same return at almost no risk.
    let n = 40;
    let a: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 0.02 } else { 0.0 }).collect();
    let b: Vec<f64> = (0..n).map(|i| if i % 2 == 0 { 0.0 } else { 0.02 }).collect();

    let single_a = optimize_sharpe(&return_frame(&["A"], &[a.clone()]), 0.0).unwrap();
    let single_b = optimize_sharpe(&return_frame(&["B"], &[b.clone()]), 0.0).unwrap();
    let pair = optimize_sharpe(&return_frame(&["A", "B"], &[a, b]), 0.0).unwrap();

    assert!(pair.sharpe > single_a.sharpe);
    assert!(pair.sharpe > single_b.sharpe);

    let sum: f64 = pair.weights.values().sum();
    assert!((sum - 1.0).abs() < 1e-6);
  }

  #[test]
  fn duplicated_ticker_columns_are_regularized_not_fatal() {
    let col: Vec<f64> = vec![0.01, -0.02, 0.015, 0.005, -0.01, 0.02];
    let frame = return_frame(&["DUP1", "DUP2"], &[col.clone(), col]);

    let result = optimize_sharpe(&frame, 0.0).unwrap();
    let sum: f64 = result.weights.values().sum();
    assert!((sum - 1.0).abs() < 1e-6);
  }

  #[test]
  fn empty_universe_is_an_error() {
    let frame = return_frame(&[], &[]);
    assert!(matches!(
      optimize_sharpe(&frame, 0.0),
      Err(OptimizeError::EmptyUniverse)
    ));
  }

  #[test]
  fn non_finite_input_is_an_error() {
    let frame = return_frame(&["AAA", "BBB"], &[
      vec![0.01, f64::NAN, 0.02],
      vec![0.00, 0.01, -0.01],
    ]);
    assert!(matches!(
      optimize_sharpe(&frame, 0.0),
      Err(OptimizeError::NonFiniteReturns)
    ));
  }

  #[test]
  fn flat_returns_are_a_degenerate_covariance() {
    let frame = return_frame(&["AAA", "BBB"], &[vec![0.0; 6], vec![0.0; 6]]);
    assert!(matches!(
      optimize_sharpe(&frame, 0.0),
      Err(OptimizeError::DegenerateCovariance(_))
    ));
  }

  #[test]
  fn risk_free_rate_lowers_the_reported_sharpe() {
    let frame = return_frame(
      &["AAA", "BBB"],
      &[
        vec![0.010, -0.005, 0.012, 0.003, -0.002, 0.007],
        vec![0.001, 0.004, -0.002, 0.006, 0.002, -0.001],
      ],
    );

    let zero_rf = optimize_sharpe(&frame, 0.0).unwrap();
    let with_rf = optimize_sharpe(&frame, 0.05).unwrap();
    assert!(with_rf.sharpe < zero_rf.sharpe);
  }
}
