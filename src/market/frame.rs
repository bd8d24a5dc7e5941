//! # Frames
//!
//! Date-indexed close-price and simple-return matrices. Missing
//! observations are encoded as `f64::NAN`; rows are trading dates in
//! ascending order, columns one ticker each.

use anyhow::ensure;
use anyhow::Result;
use chrono::Datelike;
use chrono::NaiveDate;
use ndarray::Array2;
use ndarray::ArrayView1;

/// Close-price matrix for a set of tickers over a date range.
#[derive(Clone, Debug)]
pub struct PriceFrame {
  /// Trading dates, ascending.
  pub dates: Vec<NaiveDate>,
  /// Column tickers, in request order.
  pub tickers: Vec<String>,
  /// Close prices, rows = dates, columns = tickers; NaN where missing.
  pub closes: Array2<f64>,
}

impl PriceFrame {
  /// Build a frame, validating that the matrix shape matches the axes.
  pub fn new(dates: Vec<NaiveDate>, tickers: Vec<String>, closes: Array2<f64>) -> Result<Self> {
    ensure!(
      closes.nrows() == dates.len(),
      "price matrix has {} rows for {} dates",
      closes.nrows(),
      dates.len()
    );
    ensure!(
      closes.ncols() == tickers.len(),
      "price matrix has {} columns for {} tickers",
      closes.ncols(),
      tickers.len()
    );

    Ok(Self {
      dates,
      tickers,
      closes,
    })
  }

  /// Frame with no dates and no tickers.
  pub fn empty() -> Self {
    Self {
      dates: Vec::new(),
      tickers: Vec::new(),
      closes: Array2::zeros((0, 0)),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty() || self.tickers.is_empty()
  }

  /// Column index of a ticker, if present.
  pub fn ticker_index(&self, ticker: &str) -> Option<usize> {
    self.tickers.iter().position(|t| t == ticker)
  }

  pub fn column(&self, j: usize) -> ArrayView1<'_, f64> {
    self.closes.column(j)
  }

  /// Period-over-period simple returns. The leading undefined row is
  /// dropped; a return is NaN wherever either endpoint is missing or the
  /// base price is zero.
  pub fn simple_returns(&self) -> ReturnFrame {
    let n = self.dates.len();
    let k = self.tickers.len();
    if n < 2 {
      return ReturnFrame {
        dates: Vec::new(),
        tickers: self.tickers.clone(),
        returns: Array2::from_elem((0, k), f64::NAN),
      };
    }

    let mut returns = Array2::from_elem((n - 1, k), f64::NAN);
    for t in 1..n {
      for j in 0..k {
        let prev = self.closes[[t - 1, j]];
        let cur = self.closes[[t, j]];
        if prev.is_finite() && cur.is_finite() && prev != 0.0 {
          returns[[t - 1, j]] = cur / prev - 1.0;
        }
      }
    }

    ReturnFrame {
      dates: self.dates[1..].to_vec(),
      tickers: self.tickers.clone(),
      returns,
    }
  }

  /// Resample to one row per calendar month, keeping the last available
  /// price of each (month, ticker) cell and the last trading date of the
  /// month as the row date.
  pub fn month_end(&self) -> PriceFrame {
    let k = self.tickers.len();
    let mut dates: Vec<NaiveDate> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (t, date) in self.dates.iter().enumerate() {
      let same_month = dates
        .last()
        .map(|d: &NaiveDate| d.year() == date.year() && d.month() == date.month())
        .unwrap_or(false);

      if !same_month {
        dates.push(*date);
        rows.push(vec![f64::NAN; k]);
      } else if let Some(last) = dates.last_mut() {
        *last = *date;
      }

      if let Some(row) = rows.last_mut() {
        for j in 0..k {
          let p = self.closes[[t, j]];
          if p.is_finite() {
            row[j] = p;
          }
        }
      }
    }

    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    let closes = Array2::from_shape_vec((dates.len(), k), flat)
      .unwrap_or_else(|_| Array2::from_elem((0, k), f64::NAN));

    PriceFrame {
      dates,
      tickers: self.tickers.clone(),
      closes,
    }
  }
}

/// Simple-return matrix derived from a [`PriceFrame`]; one fewer row
/// than its source.
#[derive(Clone, Debug)]
pub struct ReturnFrame {
  /// Dates of each return observation (the later endpoint).
  pub dates: Vec<NaiveDate>,
  /// Column tickers, same order as the source frame.
  pub tickers: Vec<String>,
  /// Simple returns; NaN where either endpoint was missing.
  pub returns: Array2<f64>,
}

impl ReturnFrame {
  pub fn n_obs(&self) -> usize {
    self.returns.nrows()
  }

  pub fn n_assets(&self) -> usize {
    self.returns.ncols()
  }

  pub fn column(&self, j: usize) -> ArrayView1<'_, f64> {
    self.returns.column(j)
  }

  /// Trailing `window` observations of one column ending at the latest
  /// date. `None` unless the full window exists and is gap-free.
  pub fn trailing_window(&self, j: usize, window: usize) -> Option<Vec<f64>> {
    let n = self.n_obs();
    if window == 0 || n < window {
      return None;
    }

    let tail: Vec<f64> = (n - window..n).map(|t| self.returns[[t, j]]).collect();
    if tail.iter().all(|r| r.is_finite()) {
      Some(tail)
    } else {
      None
    }
  }

  /// Drop every row containing a missing value, yielding a dense matrix.
  pub fn drop_incomplete_rows(&self) -> ReturnFrame {
    let keep: Vec<usize> = (0..self.n_obs())
      .filter(|&t| self.returns.row(t).iter().all(|r| r.is_finite()))
      .collect();

    let k = self.n_assets();
    let mut returns = Array2::zeros((keep.len(), k));
    let mut dates = Vec::with_capacity(keep.len());
    for (i, &t) in keep.iter().enumerate() {
      dates.push(self.dates[t]);
      for j in 0..k {
        returns[[i, j]] = self.returns[[t, j]];
      }
    }

    ReturnFrame {
      dates,
      tickers: self.tickers.clone(),
      returns,
    }
  }
}
