//! # Optimize
//!
//! $$
//! \max_{\mathbf{w}\in\Delta^{K-1}} \frac{252\,\mu^\top\mathbf{w}-r_f}
//! {\sqrt{252\,\mathbf{w}^\top\Sigma\mathbf{w}}}
//! $$
//!
//! Sharpe-maximizing long-only allocation and the combined
//! optimization + volatility report.

pub mod report;
pub mod sharpe;
pub mod types;

pub use report::analyze_portfolio;
pub use report::PortfolioReport;
pub use sharpe::optimize_sharpe;
pub use types::OptimizationResult;
pub use types::OptimizeError;
