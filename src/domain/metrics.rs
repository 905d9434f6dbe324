//! Summary statistics for a completed backtest run.

use super::equity::{EquityPoint, EquitySimulation};
use super::indicator::{sample_std, IndicatorSeries};
use super::signal::PositionSeries;

pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub final_strategy_equity: f64,
    pub final_benchmark_equity: f64,
    pub total_strategy_return: f64,
    pub total_benchmark_return: f64,
    /// Flat → Long transitions in the position series.
    pub trade_count: usize,
    /// Annualized sample std of the available market returns.
    pub realized_volatility: f64,
    pub strategy_volatility: f64,
    pub strategy_max_drawdown: f64,
    pub benchmark_max_drawdown: f64,
    pub bars_in_market: usize,
}

impl BacktestResult {
    pub fn compute(
        simulation: &EquitySimulation,
        positions: &PositionSeries,
        market_returns: &IndicatorSeries,
    ) -> Self {
        let strategy = &simulation.strategy;
        let benchmark = &simulation.benchmark;

        BacktestResult {
            final_strategy_equity: strategy.final_equity(),
            final_benchmark_equity: benchmark.final_equity(),
            total_strategy_return: strategy.total_return(),
            total_benchmark_return: benchmark.total_return(),
            trade_count: positions.entry_count(),
            realized_volatility: annualized_volatility(&market_returns.values),
            strategy_volatility: annualized_volatility(&simulation.strategy_returns),
            strategy_max_drawdown: max_drawdown(&strategy.points),
            benchmark_max_drawdown: max_drawdown(&benchmark.points),
            bars_in_market: positions.bars_in_market(),
        }
    }
}

/// Sample std of the available returns scaled by √252; 0.0 below two samples.
pub fn annualized_volatility(returns: &[Option<f64>]) -> f64 {
    let available: Vec<f64> = returns.iter().flatten().copied().collect();
    sample_std(&available)
        .map(|std| std * TRADING_DAYS_PER_YEAR.sqrt())
        .unwrap_or(0.0)
}

/// Largest peak-to-trough decline as a fraction of the peak.
pub fn max_drawdown(curve: &[EquityPoint]) -> f64 {
    let Some(first) = curve.first() else {
        return 0.0;
    };

    let mut peak = first.equity;
    let mut max_dd = 0.0_f64;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - point.equity) / peak);
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equity::simulate;
    use crate::domain::indicator::IndicatorType;
    use chrono::NaiveDate;

    fn make_curve(values: &[f64]) -> Vec<EquityPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        values
            .iter()
            .enumerate()
            .map(|(i, &equity)| EquityPoint {
                date: start + chrono::Duration::days(i as i64),
                equity,
            })
            .collect()
    }

    fn dates(n: usize) -> Vec<NaiveDate> {
        make_curve(&vec![0.0; n]).into_iter().map(|p| p.date).collect()
    }

    #[test]
    fn drawdown_peak_to_trough() {
        let curve = make_curve(&[100.0, 120.0, 90.0, 110.0, 80.0, 130.0]);
        // peak 120, trough 80
        assert!((max_drawdown(&curve) - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn drawdown_monotonic_is_zero() {
        let curve = make_curve(&[100.0, 101.0, 102.0]);
        assert_eq!(max_drawdown(&curve), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    #[test]
    fn volatility_skips_unavailable_returns() {
        let returns = [None, Some(0.01), Some(-0.01), None, Some(0.01)];
        let expected = sample_std(&[0.01, -0.01, 0.01]).unwrap() * 252.0_f64.sqrt();
        assert!((annualized_volatility(&returns) - expected).abs() < 1e-12);
    }

    #[test]
    fn volatility_needs_two_samples() {
        assert_eq!(annualized_volatility(&[None, Some(0.05)]), 0.0);
        assert_eq!(annualized_volatility(&[]), 0.0);
    }

    #[test]
    fn constant_returns_have_zero_volatility() {
        let returns = vec![Some(0.01); 10];
        assert!(annualized_volatility(&returns).abs() < 1e-12);
    }

    #[test]
    fn compute_summarizes_run() {
        let market = IndicatorSeries::new(
            IndicatorType::PctChange,
            vec![None, Some(0.10), Some(-0.20), Some(0.05), Some(0.10)],
        );
        let positions = PositionSeries::from_fractions(&[1.0, 0.0, 1.0, 1.0, 0.0]);
        let sim = simulate(1000.0, &dates(5), &market, &positions).unwrap();
        let result = BacktestResult::compute(&sim, &positions, &market);

        // held during bars 1, 3, 4
        let expected = 1000.0 * 1.10 * 1.05 * 1.10;
        assert!((result.final_strategy_equity - expected).abs() < 1e-9);
        assert!((result.total_strategy_return - (expected / 1000.0 - 1.0)).abs() < 1e-12);

        let bench = 1000.0 * 1.10 * 0.80 * 1.05 * 1.10;
        assert!((result.final_benchmark_equity - bench).abs() < 1e-9);

        // leading Long does not count as an entry
        assert_eq!(result.trade_count, 1);
        assert_eq!(result.bars_in_market, 3);
        assert_eq!(result.strategy_max_drawdown, 0.0);
        assert!((result.benchmark_max_drawdown - 0.20).abs() < 1e-10);
    }
}
