//! RSI (Relative Strength Index) over simple rolling means.
//!
//! delta[i] = close[i] - close[i-1] (unavailable at 0)
//! gain = max(delta, 0), loss = max(-delta, 0)
//! RSI = 100 - 100 / (1 + mean(gain, n) / mean(loss, n))
//!
//! If mean(loss, n) == 0 the ratio is undefined and RSI = 100 (including a flat
//! window where gains are zero too). Warmup: first n bars are unavailable.

use crate::domain::indicator::{rolling_mean, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceSeries;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = series.closes();

    let deltas: Vec<Option<f64>> = (0..closes.len())
        .map(|i| (i > 0).then(|| closes[i] - closes[i - 1]))
        .collect();
    let gains: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| d.max(0.0))).collect();
    let losses: Vec<Option<f64>> = deltas.iter().map(|d| d.map(|d| (-d).max(0.0))).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    let values = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => Some(rsi_from_averages(*g, *l)),
            _ => None,
        })
        .collect();

    IndicatorSeries::new(IndicatorType::Rsi(period), values)
}

pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
}
