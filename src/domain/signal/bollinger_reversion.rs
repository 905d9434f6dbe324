//! Volatility-band mean reversion.
//!
//! Stateful: the holding flag is carried bar to bar.
//! - Flat → Long when close < lower band and RSI < floor
//! - Long → Flat when close > upper band
//!
//! The position for a bar is the holding flag after that bar's transition.

use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Position, SignalRule};
use crate::domain::strategy::BollingerParams;

pub struct BollingerReversionRule {
    closes: Vec<f64>,
    upper: IndicatorSeries,
    lower: IndicatorSeries,
    rsi: IndicatorSeries,
    rsi_floor: f64,
}

impl BollingerReversionRule {
    pub fn new(series: &PriceSeries, params: &BollingerParams) -> Self {
        let bands = calculate_bollinger(series, params.band_period, params.band_width);
        Self {
            closes: series.closes(),
            upper: bands.upper,
            lower: bands.lower,
            rsi: calculate_rsi(series, params.rsi_period),
            rsi_floor: params.rsi_floor,
        }
    }

    fn should_enter(&self, index: usize) -> bool {
        let close = self.closes[index];
        match (self.lower.get(index), self.rsi.get(index)) {
            (Some(lower), Some(rsi)) => close < lower && rsi < self.rsi_floor,
            _ => false,
        }
    }

    fn should_exit(&self, index: usize) -> bool {
        let close = self.closes[index];
        self.upper.get(index).is_some_and(|upper| close > upper)
    }
}

impl SignalRule for BollingerReversionRule {
    type State = Position;

    fn bar_count(&self) -> usize {
        self.closes.len()
    }

    fn decide(&self, index: usize, holding: Position) -> (Position, Position) {
        let next = match holding {
            Position::Flat if self.should_enter(index) => Position::Long,
            Position::Long if self.should_exit(index) => Position::Flat,
            unchanged => unchanged,
        };
        (next, next)
    }
}
