//! Bollinger Bands.
//!
//! - Middle: SMA over n closes
//! - Upper: middle + width × sample stddev
//! - Lower: middle - width × sample stddev
//!
//! Default parameters: period=20, width=2.0. Warmup: first (period-1) bars.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: IndicatorSeries,
    pub middle: IndicatorSeries,
    pub lower: IndicatorSeries,
}

pub fn calculate_bollinger(series: &PriceSeries, period: usize, width: f64) -> BollingerBands {
    let middle = calculate_sma(series, period);
    let stddev = calculate_stddev(series, period);
    let width_x100 = (width * 100.0).round() as u32;

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .values
            .iter()
            .zip(&stddev.values)
            .map(|(m, s)| Some((*m)? + sign * width * (*s)?))
            .collect()
    };

    BollingerBands {
        upper: IndicatorSeries::new(
            IndicatorType::BollingerUpper { period, width_x100 },
            band(1.0),
        ),
        lower: IndicatorSeries::new(
            IndicatorType::BollingerLower { period, width_x100 },
            band(-1.0),
        ),
        middle,
    }
}
