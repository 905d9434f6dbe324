//! Volatility-contraction breakout.
//!
//! A bar triggers when all of these hold:
//! - close > SMA(trend_period) (long-term uptrend)
//! - close > (1 - near_high_pct) × MAX(high_period)
//! - yesterday's range < tightness × yesterday's ATR (contraction, lagged one bar)
//! - volume > volume_mult × volume SMA
//! - today's close-to-close return > min_return
//!
//! A trigger is an entry, not a regime: the position is held for `hold_bars`
//! bars starting at the trigger bar, and a fresh trigger restarts the count.

use crate::domain::indicator::IndicatorSeries;
use crate::domain::indicator::atr::{calculate_atr, calculate_range};
use crate::domain::indicator::pct_change::calculate_pct_change;
use crate::domain::indicator::rolling_max::calculate_rolling_max;
use crate::domain::indicator::sma::{calculate_sma, calculate_volume_sma};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{Position, SignalRule};
use crate::domain::strategy::VcpParams;

pub struct VcpBreakoutRule {
    closes: Vec<f64>,
    volumes: Vec<f64>,
    trend: IndicatorSeries,
    high: IndicatorSeries,
    range: IndicatorSeries,
    atr: IndicatorSeries,
    volume_avg: IndicatorSeries,
    returns: IndicatorSeries,
    params: VcpParams,
}

impl VcpBreakoutRule {
    pub fn new(series: &PriceSeries, params: &VcpParams) -> Self {
        Self {
            closes: series.closes(),
            volumes: series.volumes(),
            trend: calculate_sma(series, params.trend_period),
            high: calculate_rolling_max(series, params.high_period),
            range: calculate_range(series),
            atr: calculate_atr(series, params.range_period),
            volume_avg: calculate_volume_sma(series, params.volume_period),
            returns: calculate_pct_change(series),
            params: params.clone(),
        }
    }

    pub fn triggered(&self, index: usize) -> bool {
        let Some(prev) = index.checked_sub(1) else {
            return false;
        };
        let (Some(trend), Some(high), Some(prev_range), Some(prev_atr), Some(volume_avg), Some(ret)) = (
            self.trend.get(index),
            self.high.get(index),
            self.range.get(prev),
            self.atr.get(prev),
            self.volume_avg.get(index),
            self.returns.get(index),
        ) else {
            return false;
        };

        let p = &self.params;
        let close = self.closes[index];

        close > trend
            && close > high * (1.0 - p.near_high_pct)
            && prev_range < prev_atr * p.tightness
            && self.volumes[index] > volume_avg * p.volume_mult
            && ret > p.min_return
    }
}

impl SignalRule for VcpBreakoutRule {
    /// Bars still to hold after the current one.
    type State = usize;

    fn bar_count(&self) -> usize {
        self.closes.len()
    }

    fn decide(&self, index: usize, remaining: usize) -> (Position, usize) {
        if self.triggered(index) {
            (Position::Long, self.params.hold_bars.saturating_sub(1))
        } else if remaining > 0 {
            (Position::Long, remaining - 1)
        } else {
            (Position::Flat, 0)
        }
    }
}
