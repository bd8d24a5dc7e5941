use anyhow::Result;
use chrono::Days;
use chrono::NaiveDate;
use folio_rs::diversity;
use folio_rs::holdings::clean_holdings;
use folio_rs::holdings::RawHolding;
use folio_rs::holdings::SectorTable;
use folio_rs::market::Period;
use folio_rs::market::PriceFrame;
use folio_rs::market::PriceSeriesProvider;
use folio_rs::market::StaticPriceProvider;
use folio_rs::optimize::analyze_portfolio;
use folio_rs::volatility::compute_monthly_spike_patterns;
use folio_rs::volatility::compute_volatility_signals;
use folio_rs::volatility::SeasonalConfig;
use folio_rs::volatility::SpikeConfig;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

/// Synthetic daily close paths; deterministic so repeated runs match.
fn synthetic_frame(tickers: &[&str], days: usize, seed: u64) -> Result<PriceFrame> {
  let mut rng = StdRng::seed_from_u64(seed);
  let start = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
  let dates: Vec<NaiveDate> = (0..days)
    .map(|i| start.checked_add_days(Days::new(i as u64)).unwrap())
    .collect();

  let mut closes = Array2::zeros((days, tickers.len()));
  for j in 0..tickers.len() {
    let drift = 0.0002 + 0.0002 * j as f64;
    let vol = 0.008 + 0.004 * j as f64;
    let mut price = 50.0 + 25.0 * j as f64;
    for t in 0..days {
      let shock: f64 = rng.gen_range(-1.0..1.0);
      price *= 1.0 + drift + vol * shock;
      closes[[t, j]] = price;
    }
  }

  PriceFrame::new(
    dates,
    tickers.iter().map(|t| t.to_string()).collect(),
    closes,
  )
}

fn sample_holdings() -> Vec<RawHolding> {
  let rows = [
    ("AAPL", "$50,000.00"),
    ("JNJ", "$30,000.00"),
    ("JPM", "$20,000.00"),
    ("XOM", "$10,000.00"),
    ("SPAXX", "$5,000.00"),
    ("Pending Activity", "$123.45"),
  ];

  rows
    .into_iter()
    .map(|(symbol, value)| RawHolding {
      symbol: symbol.to_string(),
      current_value: Some(value.to_string()),
      ..Default::default()
    })
    .collect()
}

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let sectors = SectorTable::from_records([
    ("AAPL".to_string(), "Technology".to_string()),
    ("JNJ".to_string(), "Healthcare".to_string()),
    ("JPM".to_string(), "Finance".to_string()),
    ("XOM".to_string(), "Energy".to_string()),
  ]);

  let cleaned = clean_holdings(&sample_holdings(), &sectors);
  let holdings: Vec<_> = cleaned.iter().map(|c| c.to_holding()).collect();
  let (breakdown, metrics) = diversity::analyze(&holdings);

  let universe: Vec<String> = ["AAPL", "JNJ", "JPM", "XOM"]
    .iter()
    .map(|t| t.to_string())
    .collect();

  let mut provider = StaticPriceProvider::new();
  provider.insert(
    Period::TwoYears,
    synthetic_frame(&["AAPL", "JNJ", "JPM", "XOM"], 504, 7)?,
  );
  provider.insert(
    Period::FiveYears,
    synthetic_frame(&["AAPL", "JNJ", "JPM", "XOM"], 1260, 7)?,
  );

  let two_years = provider.fetch_prices(&universe, Period::TwoYears)?;
  let five_years = provider.fetch_prices(&universe, Period::FiveYears)?;

  let signals = compute_volatility_signals(&two_years, &SpikeConfig::default());
  let patterns =
    compute_monthly_spike_patterns(&five_years, &universe, &SeasonalConfig::default());
  let report = analyze_portfolio(&two_years, 0.0, &SpikeConfig::default())?;

  let output = serde_json::json!({
    "diversity": {
      "total_value": breakdown.total_value,
      "industry_breakdown": breakdown.rows,
      "metrics": metrics,
    },
    "volatility_analysis": signals,
    "spike_months": patterns,
    "optimization": report,
  });
  println!("{}", serde_json::to_string_pretty(&output)?);

  Ok(())
}
