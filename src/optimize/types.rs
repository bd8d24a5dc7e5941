//! # Optimizer Types
//!
//! Result container and the failure taxonomy of the Sharpe solver.
//! Statistical gaps elsewhere degrade per-ticker; optimization problems
//! are hard stops so a caller can never mistake a fabricated weight
//! vector for a solved one.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Why an optimization request could not produce a weight vector.
#[derive(Debug, Error)]
pub enum OptimizeError {
  #[error("optimization requires at least one ticker")]
  EmptyUniverse,

  #[error("return matrix contains non-finite values")]
  NonFiniteReturns,

  #[error("covariance matrix is degenerate: {0}")]
  DegenerateCovariance(String),

  #[error("solver failed: {0}")]
  Solver(String),

  #[error("solver did not converge within {max_iters} iterations")]
  NotConverged { max_iters: u64 },
}

/// Solved allocation with its realized annualized statistics. Weights
/// and ratios are rounded to six decimals for presentation.
#[derive(Clone, Debug, Serialize)]
pub struct OptimizationResult {
  /// Universe in request/column order.
  pub tickers: Vec<String>,
  /// Ticker → weight; weights lie in [0, 1] and sum to 1.
  pub weights: BTreeMap<String, f64>,
  /// Annualized Sharpe ratio at the solved weights.
  pub sharpe: f64,
  /// Annualized expected portfolio return.
  pub annual_return: f64,
  /// Annualized portfolio volatility.
  pub annual_vol: f64,
}
