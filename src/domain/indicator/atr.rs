//! Average True Range proxy.
//!
//! The per-bar range is simplified to `high - low` (no gap handling against the
//! previous close); ATR(n) is the rolling mean of that range.

use crate::domain::indicator::{defined, rolling_mean, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_range(series: &PriceSeries) -> IndicatorSeries {
    IndicatorSeries::new(IndicatorType::Range, defined(&series.ranges()))
}

pub fn calculate_atr(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Atr(period),
        rolling_mean(&defined(&series.ranges()), period),
    )
}
