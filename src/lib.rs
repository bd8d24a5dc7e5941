//! # Folio
//!
//! $$
//! \text{HHI}=\sum_i w_i^2,\qquad
//! \mathbf{w}^\*=\arg\max_{\mathbf{w}\in\Delta^{K-1}}\frac{\mathbb E[R_p]-r_f}{\sigma_p}
//! $$
//!
//! Portfolio analytics: sector concentration metrics, rolling volatility
//! spike detection with seasonal pattern mining, and Sharpe-maximizing
//! long-only allocation.

pub mod diversity;
pub mod holdings;
pub mod market;
pub mod optimize;
pub mod stats;
pub mod volatility;
