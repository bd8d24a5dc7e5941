//! # Stats
//!
//! $$
//! \Sigma_{ij} = \frac{1}{N-1}\sum_{t=1}^{N}(x_{ti}-\bar x_i)(x_{tj}-\bar x_j)
//! $$
//!
//! Shared numeric helpers for the analytics modules.

use nalgebra::DMatrix;
use ndarray::Array2;

/// Arithmetic mean; 0 for an empty slice.
pub fn sample_mean(xs: &[f64]) -> f64 {
  if xs.is_empty() {
    0.0
  } else {
    xs.iter().sum::<f64>() / xs.len() as f64
  }
}

/// Unbiased sample variance (ddof 1); 0 when fewer than two observations.
pub fn sample_variance(xs: &[f64], mean: f64) -> f64 {
  if xs.len() < 2 {
    return 0.0;
  }

  let mut acc = 0.0;
  for &x in xs {
    let d = x - mean;
    acc += d * d;
  }
  acc / (xs.len() - 1) as f64
}

/// Unbiased sample standard deviation.
pub fn sample_std(xs: &[f64]) -> f64 {
  sample_variance(xs, sample_mean(xs)).sqrt()
}

/// Compounded simple return over a window: Π(1+rᵢ) − 1.
pub fn compound_return(rets: &[f64]) -> f64 {
  rets.iter().fold(1.0, |acc, &r| acc * (1.0 + r)) - 1.0
}

/// Round to `dp` decimal places for presentation output.
pub fn round_dp(x: f64, dp: i32) -> f64 {
  let factor = 10f64.powi(dp);
  (x * factor).round() / factor
}

/// Per-column means of an observations × assets matrix.
pub fn mean_vector(returns: &Array2<f64>) -> Vec<f64> {
  let n = returns.nrows();
  let k = returns.ncols();
  if n == 0 {
    return vec![0.0; k];
  }

  (0..k)
    .map(|j| returns.column(j).sum() / n as f64)
    .collect()
}

/// Sample covariance matrix (ddof 1) across the columns of an
/// observations × assets matrix. All zeros when fewer than two rows.
pub fn covariance_matrix(returns: &Array2<f64>) -> Vec<Vec<f64>> {
  let n = returns.nrows();
  let k = returns.ncols();
  let mut cov = vec![vec![0.0; k]; k];
  if n < 2 {
    return cov;
  }

  let means = mean_vector(returns);
  for i in 0..k {
    for j in i..k {
      let mut acc = 0.0;
      for t in 0..n {
        acc += (returns[[t, i]] - means[i]) * (returns[[t, j]] - means[j]);
      }
      let c = acc / (n - 1) as f64;
      cov[i][j] = c;
      cov[j][i] = c;
    }
  }

  cov
}

/// Spectral condition number σ_max/σ_min of a square matrix.
/// Returns `f64::INFINITY` for a singular matrix.
pub fn condition_number(mat: &[Vec<f64>]) -> f64 {
  let n = mat.len();
  if n == 0 {
    return 1.0;
  }

  let m = DMatrix::from_fn(n, n, |i, j| mat[i][j]);
  let svd = m.svd(false, false);
  let s_max = svd
    .singular_values
    .iter()
    .cloned()
    .fold(f64::NEG_INFINITY, f64::max);
  let s_min = svd
    .singular_values
    .iter()
    .cloned()
    .fold(f64::INFINITY, f64::min);

  if s_min <= 0.0 || !s_min.is_finite() {
    f64::INFINITY
  } else {
    s_max / s_min
  }
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use ndarray::array;

  use super::*;

  #[test]
  fn covariance_matches_hand_computation() {
    let returns = array![[0.01, 0.02], [-0.01, 0.00], [0.02, 0.01]];
    let cov = covariance_matrix(&returns);

    // means: 0.006666..., 0.01
    assert_relative_eq!(cov[0][0], 2.3333333333e-4, epsilon = 1e-12);
    assert_relative_eq!(cov[1][1], 1e-4, epsilon = 1e-12);
    assert_relative_eq!(cov[0][1], cov[1][0], epsilon = 1e-15);
  }

  #[test]
  fn condition_number_of_identity_is_one() {
    let eye = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
    assert_relative_eq!(condition_number(&eye), 1.0, epsilon = 1e-12);
  }

  #[test]
  fn condition_number_of_singular_matrix_is_infinite() {
    let sing = vec![vec![1.0, 1.0], vec![1.0, 1.0]];
    assert!(condition_number(&sing).is_infinite());
  }

  #[test]
  fn compound_return_of_alternating_series() {
    let r = vec![0.05, -0.05];
    assert_relative_eq!(compound_return(&r), -0.0025, epsilon = 1e-12);
  }

  #[test]
  fn sample_std_handles_short_series() {
    assert_eq!(sample_std(&[0.1]), 0.0);
    assert_eq!(sample_std(&[]), 0.0);
  }
}
