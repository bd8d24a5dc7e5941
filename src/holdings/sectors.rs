//! # Sector Reference
//!
//! Immutable symbol → sector mapping, built once at startup and passed
//! by reference into consumers. Reads need no synchronization because
//! the table never changes after construction.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SectorRecord {
  symbol: String,
  sector: String,
}

/// Read-only symbol → sector lookup. Keys are case-insensitive.
#[derive(Clone, Debug, Default)]
pub struct SectorTable {
  map: HashMap<String, String>,
}

impl SectorTable {
  /// Build from in-memory (symbol, sector) records.
  pub fn from_records<I>(records: I) -> Self
  where
    I: IntoIterator<Item = (String, String)>,
  {
    let map = records
      .into_iter()
      .map(|(symbol, sector)| (symbol.trim().to_ascii_uppercase(), sector))
      .collect();
    Self { map }
  }

  /// Load from a CSV reference catalog with `symbol,sector` columns.
  pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut map = HashMap::new();
    for record in reader.deserialize() {
      let record: SectorRecord = record?;
      map.insert(record.symbol.trim().to_ascii_uppercase(), record.sector);
    }
    Ok(Self { map })
  }

  pub fn lookup(&self, symbol: &str) -> Option<&str> {
    self
      .map
      .get(&symbol.trim().to_ascii_uppercase())
      .map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.map.len()
  }

  pub fn is_empty(&self) -> bool {
    self.map.is_empty()
  }
}
