//! # Holdings Cleaning
//!
//! Scraped brokerage rows arrive as display strings ("$1,234.56",
//! "Pending Activity" placeholder rows, blank industries). This layer
//! turns them into well-formed holdings so everything downstream can
//! assume clean input.

use serde::Deserialize;
use serde::Serialize;

use super::classify::classify_symbol;
use super::classify::special_industry;
use super::classify::SymbolClass;
use super::sectors::SectorTable;
use crate::diversity::Holding;

/// Non-position rows emitted by brokerage position tables.
const SKIP_SYMBOLS: &[&str] = &["", "pending activity", "account total"];

const UNKNOWN_INDUSTRY: &str = "Unknown";

/// One scraped position row, exactly as captured.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawHolding {
  pub symbol: String,
  pub industry: Option<String>,
  pub current_value: Option<String>,
  pub quantity: Option<String>,
  pub cost_basis: Option<String>,
}

/// A normalized position ready for the analytics.
#[derive(Clone, Debug, Serialize)]
pub struct CleanedHolding {
  pub symbol: String,
  pub industry: String,
  pub value: f64,
  pub is_fund: bool,
}

impl CleanedHolding {
  /// Project down to the industry/value pair the diversity analyzer
  /// consumes.
  pub fn to_holding(&self) -> Holding {
    Holding {
      industry: self.industry.clone(),
      value: self.value,
    }
  }
}

/// Parse a display currency string: "$1,234.56" → 1234.56,
/// "($500.00)" → −500.0. Placeholder dashes and unparsable text yield
/// `None`.
pub fn parse_currency(raw: &str) -> Option<f64> {
  let mut s = raw.trim();
  if s.is_empty() || s == "—" || s == "-" || s == "–" {
    return None;
  }

  let negative = s.starts_with('(') && s.ends_with(')');
  if negative {
    s = &s[1..s.len() - 1];
  }

  let cleaned: String = s
    .chars()
    .filter(|c| !matches!(c, '$' | ',' | ' '))
    .collect();

  let value: f64 = cleaned.parse().ok()?;
  if !value.is_finite() {
    return None;
  }

  Some(if negative { -value } else { value })
}

fn resolve_industry(raw: &RawHolding, sectors: &SectorTable) -> String {
  if let Some(industry) = raw.industry.as_deref() {
    let trimmed = industry.trim();
    if !trimmed.is_empty() {
      return trimmed.to_string();
    }
  }

  if let Some(special) = special_industry(&raw.symbol) {
    return special.to_string();
  }

  sectors
    .lookup(&raw.symbol)
    .map(|s| s.to_string())
    .unwrap_or_else(|| UNKNOWN_INDUSTRY.to_string())
}

/// Normalize scraped rows. Placeholder rows and rows without a usable
/// non-negative value are dropped silently; the analytics prefer a
/// partial portfolio over a hard failure here.
pub fn clean_holdings(raw_holdings: &[RawHolding], sectors: &SectorTable) -> Vec<CleanedHolding> {
  let mut cleaned = Vec::with_capacity(raw_holdings.len());

  for raw in raw_holdings {
    let symbol = raw.symbol.trim();
    if SKIP_SYMBOLS.contains(&symbol.to_lowercase().as_str()) {
      continue;
    }

    let Some(value) = raw.current_value.as_deref().and_then(parse_currency) else {
      continue;
    };
    if value < 0.0 {
      continue;
    }

    let class = classify_symbol(symbol);
    cleaned.push(CleanedHolding {
      symbol: symbol.to_ascii_uppercase(),
      industry: resolve_industry(raw, sectors),
      value,
      is_fund: matches!(class, SymbolClass::MutualFund | SymbolClass::Cash),
    });
  }

  cleaned
}
