//! Equity simulation: position series + market returns → compounded curves.
//!
//! The position decided at the close of bar i-1 is the one held through bar
//! i's price move, so strategy_return[i] = position[i-1] × market_return[i].
//! Unavailable returns contribute 0.0 (equity unchanged for that bar), and
//! equity[0] is the initial capital for both curves.

use crate::domain::error::StratbenchError;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::signal::PositionSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityCurve {
    pub initial_capital: f64,
    pub points: Vec<EquityPoint>,
}

impl EquityCurve {
    pub fn final_equity(&self) -> f64 {
        self.points
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }

    pub fn total_return(&self) -> f64 {
        self.final_equity() / self.initial_capital - 1.0
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.equity).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquitySimulation {
    pub strategy_returns: Vec<Option<f64>>,
    pub strategy: EquityCurve,
    pub benchmark: EquityCurve,
}

/// Lagged strategy returns; index 0 is always unavailable.
pub fn strategy_returns(
    positions: &PositionSeries,
    market_returns: &IndicatorSeries,
) -> Vec<Option<f64>> {
    (0..market_returns.len())
        .map(|i| {
            let held = positions.get(i.checked_sub(1)?)?;
            Some(held.fraction() * market_returns.get(i)?)
        })
        .collect()
}

/// Compound `returns` from `initial_capital`; `returns[0]` is never applied.
pub fn compound(initial_capital: f64, dates: &[NaiveDate], returns: &[Option<f64>]) -> EquityCurve {
    let mut points = Vec::with_capacity(dates.len());
    let mut equity = initial_capital;

    for (i, &date) in dates.iter().enumerate() {
        if i > 0 {
            let r = returns.get(i).copied().flatten().unwrap_or(0.0);
            equity *= 1.0 + r;
        }
        points.push(EquityPoint { date, equity });
    }

    EquityCurve {
        initial_capital,
        points,
    }
}

pub fn simulate(
    initial_capital: f64,
    dates: &[NaiveDate],
    market_returns: &IndicatorSeries,
    positions: &PositionSeries,
) -> Result<EquitySimulation, StratbenchError> {
    if !(initial_capital > 0.0 && initial_capital.is_finite()) {
        return Err(StratbenchError::InvalidCapital {
            value: initial_capital,
        });
    }
    if market_returns.len() != dates.len() || positions.len() != dates.len() {
        return Err(StratbenchError::InvalidParameter {
            name: "series".into(),
            reason: format!(
                "length mismatch: {} dates, {} returns, {} positions",
                dates.len(),
                market_returns.len(),
                positions.len()
            ),
        });
    }

    let strategy_returns = strategy_returns(positions, market_returns);
    let strategy = compound(initial_capital, dates, &strategy_returns);
    let benchmark = compound(initial_capital, dates, &market_returns.values);

    Ok(EquitySimulation {
        strategy_returns,
        strategy,
        benchmark,
    })
}
