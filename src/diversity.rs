//! # Diversity
//!
//! $$
//! \text{HHI}=\sum_i w_i^2,\qquad H=-\sum_{p_i>0} p_i\ln p_i
//! $$
//!
//! Industry concentration metrics over cleaned holdings.

use std::collections::HashMap;
use std::fmt::Display;

use serde::Serialize;

/// A cleaned holding: an industry label and a non-negative market value.
/// Collection order is irrelevant.
#[derive(Clone, Debug, Serialize)]
pub struct Holding {
  pub industry: String,
  pub value: f64,
}

/// One row of an industry breakdown.
#[derive(Clone, Debug, Serialize)]
pub struct IndustryRow {
  pub industry: String,
  pub value: f64,
  /// Share of total portfolio value, in percent; 0 when the total is 0.
  pub weight_pct: f64,
}

/// Per-industry aggregation, sorted by value descending. Ties keep
/// first-occurrence order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct IndustryBreakdown {
  pub total_value: f64,
  pub rows: Vec<IndustryRow>,
}

/// Qualitative concentration rating derived from HHI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiversificationRating {
  #[serde(rename = "No Data")]
  NoData,
  #[serde(rename = "Well Diversified")]
  WellDiversified,
  #[serde(rename = "Moderate")]
  Moderate,
  #[serde(rename = "Concentrated")]
  Concentrated,
}

impl Display for DiversificationRating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DiversificationRating::NoData => write!(f, "No Data"),
      DiversificationRating::WellDiversified => write!(f, "Well Diversified"),
      DiversificationRating::Moderate => write!(f, "Moderate"),
      DiversificationRating::Concentrated => write!(f, "Concentrated"),
    }
  }
}

/// Concentration metrics over an [`IndustryBreakdown`].
#[derive(Clone, Debug, Serialize)]
pub struct ConcentrationMetrics {
  /// Herfindahl-Hirschman Index on the 0..10,000 percent-weight scale.
  pub hhi: f64,
  /// Shannon entropy of the industry distribution, in nats.
  pub entropy: f64,
  /// e^entropy; 0 when there is no data at all.
  pub effective_industries: f64,
  pub top_industry_weight_pct: f64,
  pub rating: DiversificationRating,
}

/// Aggregate holdings per industry and attach percent weights.
pub fn industry_breakdown(holdings: &[Holding]) -> IndustryBreakdown {
  let mut order: Vec<String> = Vec::new();
  let mut totals: HashMap<String, f64> = HashMap::new();
  let mut total_value = 0.0;

  for h in holdings {
    total_value += h.value;
    if !totals.contains_key(&h.industry) {
      order.push(h.industry.clone());
    }
    *totals.entry(h.industry.clone()).or_insert(0.0) += h.value;
  }

  let mut rows: Vec<IndustryRow> = order
    .into_iter()
    .map(|industry| {
      let value = totals[&industry];
      let weight_pct = if total_value > 0.0 {
        value / total_value * 100.0
      } else {
        0.0
      };
      IndustryRow {
        industry,
        value,
        weight_pct,
      }
    })
    .collect();

  // Stable sort keeps first-occurrence order among equal values.
  rows.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));

  IndustryBreakdown { total_value, rows }
}

/// HHI = Σ weight_pct²; ranges over [0, 10000].
pub fn hhi(breakdown: &IndustryBreakdown) -> f64 {
  breakdown.rows.iter().map(|r| r.weight_pct.powi(2)).sum()
}

/// Shannon entropy (natural log) over positive industry weights.
pub fn entropy(breakdown: &IndustryBreakdown) -> f64 {
  let mut h = 0.0;
  for row in &breakdown.rows {
    let p = row.weight_pct / 100.0;
    if p > 0.0 {
      h -= p * p.ln();
    }
  }
  h
}

/// Thresholds are inclusive lower bounds of the next tier: 1500 is
/// already Moderate, 2500 already Concentrated.
pub fn rating_from_hhi(hhi: f64) -> DiversificationRating {
  if hhi == 0.0 {
    DiversificationRating::NoData
  } else if hhi < 1500.0 {
    DiversificationRating::WellDiversified
  } else if hhi < 2500.0 {
    DiversificationRating::Moderate
  } else {
    DiversificationRating::Concentrated
  }
}

/// Compute all concentration metrics from a breakdown.
pub fn concentration_metrics(breakdown: &IndustryBreakdown) -> ConcentrationMetrics {
  let hhi = hhi(breakdown);
  let entropy = entropy(breakdown);
  let effective_industries = if breakdown.total_value > 0.0 {
    entropy.exp()
  } else {
    0.0
  };
  let top_industry_weight_pct = breakdown.rows.first().map(|r| r.weight_pct).unwrap_or(0.0);

  ConcentrationMetrics {
    hhi,
    entropy,
    effective_industries,
    top_industry_weight_pct,
    rating: rating_from_hhi(hhi),
  }
}

/// Full diversity analysis: breakdown plus metrics. Pure and
/// deterministic; malformed rows are the cleaning layer's concern.
pub fn analyze(holdings: &[Holding]) -> (IndustryBreakdown, ConcentrationMetrics) {
  let breakdown = industry_breakdown(holdings);
  let metrics = concentration_metrics(&breakdown);
  (breakdown, metrics)
}
