//! Trailing maximum of closes (e.g. 252 bars for a 52-week high).

use crate::domain::indicator::{defined, rolling_max, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_rolling_max(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::RollingMax(period),
        rolling_max(&defined(&series.closes()), period),
    )
}
