//! Rolling standard deviation of closes.
//!
//! Unbiased sample standard deviation (divides by n - 1) over the last n closes.
//! Warmup: first (n-1) bars are unavailable; n < 2 is never available.

use crate::domain::indicator::{defined, rolling_sample_std, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_stddev(series: &PriceSeries, period: usize) -> IndicatorSeries {
    IndicatorSeries::new(
        IndicatorType::Stddev(period),
        rolling_sample_std(&defined(&series.closes()), period),
    )
}
