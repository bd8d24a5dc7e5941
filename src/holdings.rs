//! # Holdings
//!
//! Normalization of scraped position rows into cleaned holdings:
//! currency-string parsing, symbol classification rule tables and the
//! sector reference lookup. The numeric analytics only ever see the
//! cleaned output.

pub mod classify;
pub mod clean;
pub mod sectors;

pub use classify::classify_symbol;
pub use classify::special_industry;
pub use classify::SymbolClass;
pub use clean::clean_holdings;
pub use clean::parse_currency;
pub use clean::CleanedHolding;
pub use clean::RawHolding;
pub use sectors::SectorTable;
