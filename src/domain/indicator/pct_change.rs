//! Close-to-close percent change.
//!
//! r[i] = (close[i] - close[i-1]) / close[i-1]. Unavailable at index 0 and
//! wherever the previous close is zero. A validated `PriceSeries` has no zero
//! closes, so the guard only matters for raw slices.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_pct_change(series: &PriceSeries) -> IndicatorSeries {
    IndicatorSeries::new(IndicatorType::PctChange, pct_changes(&series.closes()))
}

pub(crate) fn pct_changes(closes: &[f64]) -> Vec<Option<f64>> {
    let mut values = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        let value = match i {
            0 => None,
            _ if closes[i - 1] == 0.0 => None,
            _ => Some((closes[i] - closes[i - 1]) / closes[i - 1]),
        };
        values.push(value);
    }

    values
}
