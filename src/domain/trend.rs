//! Latest-bar trend snapshot for a single symbol.

use crate::domain::error::StratbenchError;
use crate::domain::indicator::pct_change::calculate_pct_change;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::metrics::annualized_volatility;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Undetermined,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "up"),
            Trend::Down => write!(f, "down"),
            Trend::Undetermined => write!(f, "undetermined"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendSnapshot {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub bars: usize,
    pub last_close: f64,
    pub short_period: usize,
    pub long_period: usize,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
    pub annualized_volatility: f64,
    pub trend: Trend,
}

impl TrendSnapshot {
    pub fn compute(
        series: &PriceSeries,
        short_period: usize,
        long_period: usize,
    ) -> Result<Self, StratbenchError> {
        if short_period == 0 || short_period >= long_period {
            return Err(StratbenchError::InvalidParameter {
                name: "short_period".into(),
                reason: "must be at least 1 and below long_period".into(),
            });
        }

        let short_ma = calculate_sma(series, short_period).last();
        let long_ma = calculate_sma(series, long_period).last();
        let trend = match (short_ma, long_ma) {
            (Some(s), Some(l)) if s > l => Trend::Up,
            (Some(s), Some(l)) if s < l => Trend::Down,
            _ => Trend::Undetermined,
        };

        let returns = calculate_pct_change(series);
        let closes = series.closes();

        Ok(TrendSnapshot {
            first_date: series.first_date(),
            last_date: series.last_date(),
            bars: series.len(),
            last_close: closes[closes.len() - 1],
            short_period,
            long_period,
            short_ma,
            long_ma,
            annualized_volatility: annualized_volatility(&returns.values),
            trend,
        })
    }
}
