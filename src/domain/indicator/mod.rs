//! Technical indicator implementations.
//!
//! Every indicator produces an [`IndicatorSeries`]: one `Option<f64>` per input
//! bar, aligned index-for-index with the [`PriceSeries`](crate::domain::ohlcv::PriceSeries).
//! `None` means "not available" (the window has not filled yet, or an input in
//! the window was itself unavailable). It is never conflated with zero.
//!
//! All rolling operations are causal: the value at index `i` reads only inputs
//! at indices `i + 1 - window ..= i`.

pub mod atr;
pub mod bollinger;
pub mod pct_change;
pub mod rolling_max;
pub mod rsi;
pub mod sma;
pub mod stddev;

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    VolumeSma(usize),
    Stddev(usize),
    Rsi(usize),
    Range,
    Atr(usize),
    RollingMax(usize),
    PctChange,
    BollingerUpper { period: usize, width_x100: u32 },
    BollingerLower { period: usize, width_x100: u32 },
}

impl IndicatorType {
    /// Nominal window length in bars.
    pub fn window(&self) -> usize {
        match self {
            IndicatorType::Sma(p)
            | IndicatorType::VolumeSma(p)
            | IndicatorType::Stddev(p)
            | IndicatorType::Rsi(p)
            | IndicatorType::Atr(p)
            | IndicatorType::RollingMax(p) => *p,
            IndicatorType::Range | IndicatorType::PctChange => 1,
            IndicatorType::BollingerUpper { period, .. }
            | IndicatorType::BollingerLower { period, .. } => *period,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Range => write!(f, "RANGE"),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::RollingMax(period) => write!(f, "MAX({})", period),
            IndicatorType::PctChange => write!(f, "PCT_CHANGE"),
            IndicatorType::BollingerUpper { period, width_x100 } => {
                write!(f, "BB_UPPER({},{})", period, *width_x100 as f64 / 100.0)
            }
            IndicatorType::BollingerLower { period, width_x100 } => {
                write!(f, "BB_LOWER({},{})", period, *width_x100 as f64 / 100.0)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Vec<Option<f64>>) -> Self {
        Self {
            indicator_type,
            values,
        }
    }

    /// Value at `index`, or `None` when unavailable or out of bounds.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }
}

/// Apply `reduce` over every full trailing window of `values`.
///
/// A window is skipped (yielding `None`) while it is still filling or when any
/// input inside it is unavailable.
pub fn rolling<F>(values: &[Option<f64>], window: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut buf = Vec::with_capacity(window);

    for i in 0..values.len() {
        if i + 1 < window {
            out.push(None);
            continue;
        }
        buf.clear();
        let complete = values[i + 1 - window..=i].iter().all(|v| match v {
            Some(x) => {
                buf.push(*x);
                true
            }
            None => false,
        });
        out.push(if complete { reduce(&buf) } else { None });
    }

    out
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| Some(mean(w)))
}

/// Unbiased (n - 1) sample standard deviation; needs `window >= 2`.
pub fn rolling_sample_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, sample_std)
}

pub fn rolling_max(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().copied().reduce(f64::max))
}

/// The shared value when every element is equal.
fn constant_value(values: &[f64]) -> Option<f64> {
    let first = *values.first()?;
    values.iter().all(|&v| v == first).then_some(first)
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if let Some(c) = constant_value(values) {
        return c;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Shifted by the first element so a flat window sums exact zeros.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    if constant_value(values).is_some() {
        return Some(0.0);
    }
    let shift = values[0];
    let n = values.len() as f64;
    let shifted_mean = values.iter().map(|v| v - shift).sum::<f64>() / n;
    let ss: f64 = values
        .iter()
        .map(|v| {
            let diff = (v - shift) - shifted_mean;
            diff * diff
        })
        .sum();
    Some((ss / (n - 1.0)).sqrt())
}

pub(crate) fn defined(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().copied().map(Some).collect()
}
