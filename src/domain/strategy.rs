//! Strategy variants and their parameters.

use crate::domain::error::StratbenchError;
use crate::domain::indicator::IndicatorType;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::bollinger_reversion::BollingerReversionRule;
use crate::domain::signal::ma_crossover::MaCrossoverRule;
use crate::domain::signal::vcp_breakout::VcpBreakoutRule;
use crate::domain::signal::{generate_positions, PositionSeries};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct MaCrossoverParams {
    pub fast_period: usize,
    pub slow_period: usize,
    pub rsi_period: usize,
    /// Entries need RSI strictly below this; `None` disables the momentum filter.
    pub rsi_ceiling: Option<f64>,
}

impl Default for MaCrossoverParams {
    fn default() -> Self {
        Self {
            fast_period: 10,
            slow_period: 20,
            rsi_period: 14,
            rsi_ceiling: Some(70.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerParams {
    pub band_period: usize,
    pub band_width: f64,
    pub rsi_period: usize,
    pub rsi_floor: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            band_period: 20,
            band_width: 2.0,
            rsi_period: 14,
            rsi_floor: 35.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VcpParams {
    pub trend_period: usize,
    pub high_period: usize,
    /// Close must sit within this fraction of the trailing high.
    pub near_high_pct: f64,
    pub range_period: usize,
    /// Yesterday's range must be below `tightness × ATR`.
    pub tightness: f64,
    pub volume_period: usize,
    pub volume_mult: f64,
    pub min_return: f64,
    /// Bars held after each trigger; 1 holds exactly the next bar's move.
    pub hold_bars: usize,
}

impl Default for VcpParams {
    fn default() -> Self {
        Self {
            trend_period: 200,
            high_period: 252,
            near_high_pct: 0.15,
            range_period: 20,
            tightness: 0.95,
            volume_period: 20,
            volume_mult: 1.2,
            min_return: 0.01,
            hold_bars: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    MaCrossover(MaCrossoverParams),
    BollingerReversion(BollingerParams),
    VcpBreakout(VcpParams),
}

impl StrategyKind {
    pub const KEYS: [&'static str; 3] = ["ma_crossover", "bollinger_reversion", "vcp_breakout"];

    /// Default-parameter strategy for a config key.
    pub fn from_key(key: &str) -> Result<Self, StratbenchError> {
        match key.trim().to_lowercase().as_str() {
            "ma_crossover" => Ok(StrategyKind::MaCrossover(MaCrossoverParams::default())),
            "bollinger_reversion" => {
                Ok(StrategyKind::BollingerReversion(BollingerParams::default()))
            }
            "vcp_breakout" => Ok(StrategyKind::VcpBreakout(VcpParams::default())),
            other => Err(StratbenchError::UnknownStrategy(other.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            StrategyKind::MaCrossover(_) => "ma_crossover",
            StrategyKind::BollingerReversion(_) => "bollinger_reversion",
            StrategyKind::VcpBreakout(_) => "vcp_breakout",
        }
    }

    /// Indicators whose windows must fit inside the series.
    pub fn indicators(&self) -> Vec<IndicatorType> {
        match self {
            StrategyKind::MaCrossover(p) => {
                let mut v = vec![IndicatorType::Sma(p.fast_period), IndicatorType::Sma(p.slow_period)];
                if p.rsi_ceiling.is_some() {
                    v.push(IndicatorType::Rsi(p.rsi_period));
                }
                v
            }
            StrategyKind::BollingerReversion(p) => {
                let width_x100 = (p.band_width * 100.0).round() as u32;
                vec![
                    IndicatorType::BollingerUpper {
                        period: p.band_period,
                        width_x100,
                    },
                    IndicatorType::BollingerLower {
                        period: p.band_period,
                        width_x100,
                    },
                    IndicatorType::Rsi(p.rsi_period),
                ]
            }
            StrategyKind::VcpBreakout(p) => vec![
                IndicatorType::Sma(p.trend_period),
                IndicatorType::RollingMax(p.high_period),
                IndicatorType::Atr(p.range_period),
                IndicatorType::VolumeSma(p.volume_period),
                IndicatorType::PctChange,
            ],
        }
    }

    /// Reject parameter sets that cannot produce a meaningful signal.
    pub fn validate(&self) -> Result<(), StratbenchError> {
        let invalid = |name: &str, reason: &str| StratbenchError::InvalidParameter {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let positive = |v: f64| v > 0.0 && v.is_finite();

        match self {
            StrategyKind::MaCrossover(p) => {
                if p.fast_period == 0 || p.rsi_period == 0 {
                    return Err(invalid("fast_period", "periods must be at least 1"));
                }
                if p.fast_period >= p.slow_period {
                    return Err(invalid("slow_period", "slow_period must exceed fast_period"));
                }
                if p.rsi_ceiling.is_some_and(|c| !c.is_finite()) {
                    return Err(invalid("rsi_ceiling", "must be finite"));
                }
            }
            StrategyKind::BollingerReversion(p) => {
                if p.band_period < 2 {
                    return Err(invalid("band_period", "band_period must be at least 2"));
                }
                if p.rsi_period == 0 {
                    return Err(invalid("rsi_period", "rsi_period must be at least 1"));
                }
                if !positive(p.band_width) {
                    return Err(invalid("band_width", "band_width must be positive"));
                }
                if !(positive(p.rsi_floor) && p.rsi_floor <= 100.0) {
                    return Err(invalid("rsi_floor", "must be in (0, 100]"));
                }
            }
            StrategyKind::VcpBreakout(p) => {
                if [p.trend_period, p.high_period, p.range_period, p.volume_period].contains(&0) {
                    return Err(invalid("period", "periods must be at least 1"));
                }
                if !(0.0..1.0).contains(&p.near_high_pct) {
                    return Err(invalid("near_high_pct", "must be in [0, 1)"));
                }
                if !positive(p.tightness) {
                    return Err(invalid("tightness", "tightness must be positive"));
                }
                if !positive(p.volume_mult) {
                    return Err(invalid("volume_mult", "volume_mult must be positive"));
                }
                if !(p.min_return >= 0.0 && p.min_return.is_finite()) {
                    return Err(invalid("min_return", "must be finite and non-negative"));
                }
                if p.hold_bars == 0 {
                    return Err(invalid("hold_bars", "hold_bars must be at least 1"));
                }
            }
        }
        Ok(())
    }

    /// Run this variant's decision rule over the series.
    pub fn positions(&self, series: &PriceSeries) -> PositionSeries {
        match self {
            StrategyKind::MaCrossover(p) => generate_positions(&MaCrossoverRule::new(series, p)),
            StrategyKind::BollingerReversion(p) => {
                generate_positions(&BollingerReversionRule::new(series, p))
            }
            StrategyKind::VcpBreakout(p) => generate_positions(&VcpBreakoutRule::new(series, p)),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::MaCrossover(p) => match p.rsi_ceiling {
                Some(c) => write!(
                    f,
                    "MA Crossover SMA({})/SMA({}) with RSI({}) < {}",
                    p.fast_period, p.slow_period, p.rsi_period, c
                ),
                None => write!(f, "MA Crossover SMA({})/SMA({})", p.fast_period, p.slow_period),
            },
            StrategyKind::BollingerReversion(p) => write!(
                f,
                "Bollinger Reversion ({}, {}) with RSI({}) < {}",
                p.band_period, p.band_width, p.rsi_period, p.rsi_floor
            ),
            StrategyKind::VcpBreakout(p) => write!(
                f,
                "VCP Breakout SMA({}) / MAX({}) hold {} bar(s)",
                p.trend_period, p.high_period, p.hold_bars
            ),
        }
    }
}
