//! # Market
//!
//! $$
//! r_t = \frac{P_t}{P_{t-1}} - 1
//! $$
//!
//! Price/return frames and the price-series provider seam.

pub mod frame;
pub mod provider;

pub use frame::PriceFrame;
pub use frame::ReturnFrame;
pub use provider::Period;
pub use provider::PriceSeriesProvider;
pub use provider::StaticPriceProvider;
