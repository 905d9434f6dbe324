//! Moving-average crossover with an RSI momentum filter.
//!
//! Stateless: Long iff fast SMA > slow SMA and RSI < ceiling, re-evaluated
//! every bar with no hysteresis.

use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Position, SignalRule};
use crate::domain::strategy::MaCrossoverParams;

pub struct MaCrossoverRule {
    fast: IndicatorSeries,
    slow: IndicatorSeries,
    rsi: IndicatorSeries,
    rsi_ceiling: Option<f64>,
}

impl MaCrossoverRule {
    pub fn new(series: &PriceSeries, params: &MaCrossoverParams) -> Self {
        Self {
            fast: calculate_sma(series, params.fast_period),
            slow: calculate_sma(series, params.slow_period),
            rsi: calculate_rsi(series, params.rsi_period),
            rsi_ceiling: params.rsi_ceiling,
        }
    }

    fn momentum_ok(&self, index: usize) -> bool {
        match self.rsi_ceiling {
            None => true,
            Some(ceiling) => self.rsi.get(index).is_some_and(|rsi| rsi < ceiling),
        }
    }
}

impl SignalRule for MaCrossoverRule {
    type State = ();

    fn bar_count(&self) -> usize {
        self.fast.len()
    }

    fn decide(&self, index: usize, _state: ()) -> (Position, ()) {
        let crossed = match (self.fast.get(index), self.slow.get(index)) {
            (Some(fast), Some(slow)) => fast > slow,
            _ => false,
        };
        (Position::from_flag(crossed && self.momentum_ok(index)), ())
    }
}
