//! CSV file data adapter.
//!
//! One file per symbol, `<base>/<SYMBOL>_prices.csv`, with a header row naming
//! `Date,Open,High,Low,Close,Volume` in any order and case.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const FILE_SUFFIX: &str = "_prices.csv";
const COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}{}", symbol, FILE_SUFFIX))
    }
}

fn data_error(reason: String) -> StratbenchError {
    StratbenchError::DataSource { reason }
}

/// Positions of the six required columns in the header row.
fn column_indices(headers: &csv::StringRecord) -> Result<[usize; 6], StratbenchError> {
    let mut indices = [0usize; 6];
    for (slot, name) in indices.iter_mut().zip(COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
            .ok_or_else(|| data_error(format!("missing {} column", name)))?;
    }
    Ok(indices)
}

/// `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_date(raw: &str) -> Result<NaiveDate, StratbenchError> {
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| data_error(format!("invalid date {:?}: {}", raw, e)))
}

fn parse_field(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, StratbenchError> {
    let raw = record
        .get(index)
        .ok_or_else(|| data_error(format!("missing {} value", name)))?;
    raw.trim()
        .parse()
        .map_err(|e| data_error(format!("invalid {} value {:?}: {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<OhlcvBar>, StratbenchError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path)
            .map_err(|e| data_error(format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| data_error(format!("CSV header error: {}", e)))?
            .clone();
        let [date, open, high, low, close, volume] = column_indices(&headers)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| data_error(format!("CSV parse error: {}", e)))?;
            let raw_date = record
                .get(date)
                .ok_or_else(|| data_error("missing date value".into()))?;

            bars.push(OhlcvBar {
                date: parse_date(raw_date)?,
                open: parse_field(&record, open, "open")?,
                high: parse_field(&record, high, "high")?,
                low: parse_field(&record, low, "low")?,
                close: parse_field(&record, close, "close")?,
                volume: parse_field(&record, volume, "volume")?,
            });
        }

        debug!(symbol, bars = bars.len(), path = %path.display(), "loaded price file");
        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            data_error(format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ))
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| data_error(format!("directory entry error: {}", e)))?;
            let name = entry.file_name();
            if let Some(symbol) = name.to_string_lossy().strip_suffix(FILE_SUFFIX) {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
