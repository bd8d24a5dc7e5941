//! # Symbol Classification
//!
//! Explicit rule tables for symbols whose industry cannot come from the
//! sector reference: money-market/cash sweeps, precious-metal ETFs and
//! mutual-fund share classes. Tables are data, so each rule is testable
//! on its own and the numeric core stays free of symbol heuristics.

/// Precious-metal ETFs mapped straight to a metals industry; these track
/// bullion, not an equity sector.
pub const PRECIOUS_METAL_ETFS: &[(&str, &str)] = &[
  ("GLD", "Precious Metals"),
  ("IAU", "Precious Metals"),
  ("SGOL", "Precious Metals"),
  ("SLV", "Precious Metals"),
  ("SIVR", "Precious Metals"),
  ("PPLT", "Precious Metals"),
  ("PALL", "Precious Metals"),
];

/// Brokerage sweep and money-market symbols treated as cash.
pub const CASH_SYMBOLS: &[&str] = &[
  "SPAXX", "FDRXX", "FZFXX", "SPRXX", "FCASH", "CORE", "CASH",
];

const CASH_INDUSTRY: &str = "Cash & Equivalents";
const MUTUAL_FUND_INDUSTRY: &str = "Mutual Funds";

/// Coarse class of a position symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolClass {
  Cash,
  PreciousMetalEtf,
  MutualFund,
  Equity,
}

/// US mutual-fund share classes are five uppercase letters ending in X
/// (FXAIX, VTSAX, ...).
pub fn looks_like_mutual_fund(symbol: &str) -> bool {
  symbol.len() == 5
    && symbol.chars().all(|c| c.is_ascii_uppercase())
    && symbol.ends_with('X')
}

/// Classify a symbol against the rule tables. Cash symbols win over the
/// mutual-fund shape (money-market tickers share it).
pub fn classify_symbol(symbol: &str) -> SymbolClass {
  let upper = symbol.trim().to_ascii_uppercase();

  if CASH_SYMBOLS.contains(&upper.as_str()) {
    return SymbolClass::Cash;
  }
  if PRECIOUS_METAL_ETFS.iter().any(|(s, _)| *s == upper) {
    return SymbolClass::PreciousMetalEtf;
  }
  if looks_like_mutual_fund(&upper) {
    return SymbolClass::MutualFund;
  }

  SymbolClass::Equity
}

/// Industry override implied by the rule tables, if any. Plain equities
/// resolve through the sector reference instead.
pub fn special_industry(symbol: &str) -> Option<&'static str> {
  let upper = symbol.trim().to_ascii_uppercase();

  match classify_symbol(&upper) {
    SymbolClass::Cash => Some(CASH_INDUSTRY),
    SymbolClass::PreciousMetalEtf => PRECIOUS_METAL_ETFS
      .iter()
      .find(|(s, _)| *s == upper)
      .map(|(_, industry)| *industry),
    SymbolClass::MutualFund => Some(MUTUAL_FUND_INDUSTRY),
    SymbolClass::Equity => None,
  }
}
