#![allow(dead_code)]

use chrono::NaiveDate;
use stratbench::domain::error::StratbenchError;
pub use stratbench::domain::ohlcv::{OhlcvBar, PriceSeries};
use stratbench::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<OhlcvBar>, StratbenchError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(StratbenchError::DataSource {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + chrono::Duration::days(offset as i64)
}

/// Bar with open = close and a one-unit range around the close.
pub fn make_bar(index: usize, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: day(index),
        open: close,
        high: close + 0.5,
        low: (close - 0.5).max(0.0),
        close,
        volume: 10_000.0,
    }
}

pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c))
        .collect()
}

pub fn make_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(make_bars(closes)).unwrap()
}

/// `n` closes growing by `rate` per bar from `start`.
pub fn growth_closes(start: f64, rate: f64, n: usize) -> Vec<f64> {
    (0..n).map(|i| start * (1.0 + rate).powi(i as i32)).collect()
}

/// Deterministic oscillating closes around 100.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 8.0 * (t * 0.31).sin() + 3.0 * (t * 0.07).cos() + 0.05 * t
        })
        .collect()
}

pub fn bars_to_csv(bars: &[OhlcvBar]) -> String {
    let mut out = String::from("Date,Open,High,Low,Close,Volume\n");
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date.format("%Y-%m-%d"),
            b.open,
            b.high,
            b.low,
            b.close,
            b.volume
        ));
    }
    out
}
