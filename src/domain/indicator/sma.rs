//! Simple moving averages over closes and volume.
//!
//! SMA(n)[i] = mean(x[i-n+1..=i]); first (n-1) bars are unavailable.

use crate::domain::indicator::{defined, rolling_mean, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Sma(period),
        rolling_mean(&defined(&series.closes()), period),
    )
}

pub fn calculate_volume_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::VolumeSma(period),
        rolling_mean(&defined(&series.volumes()), period),
    )
}
