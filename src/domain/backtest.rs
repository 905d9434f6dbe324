//! Backtest pipeline: price series → indicators → positions → equity → summary.

use crate::domain::equity::{simulate, EquitySimulation};
use crate::domain::error::StratbenchError;
use crate::domain::indicator::pct_change::calculate_pct_change;
use crate::domain::indicator::IndicatorSeries;
use crate::domain::metrics::BacktestResult;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::PositionSeries;
use crate::domain::strategy::StrategyKind;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    /// Most recent bars to evaluate; 0 keeps the whole series.
    pub lookback: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_capital: 10_000.0,
            lookback: 500,
        }
    }
}

/// Every intermediate series of one run, aligned with `series`.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRun {
    pub strategy: StrategyKind,
    pub series: PriceSeries,
    pub market_returns: IndicatorSeries,
    pub positions: PositionSeries,
    pub equity: EquitySimulation,
    pub result: BacktestResult,
}

/// Fail fast on anything that would make the run meaningless.
pub fn validate_inputs(
    series: &PriceSeries,
    strategy: &StrategyKind,
    config: &BacktestConfig,
) -> Result<(), StratbenchError> {
    if !(config.initial_capital > 0.0 && config.initial_capital.is_finite()) {
        return Err(StratbenchError::InvalidCapital {
            value: config.initial_capital,
        });
    }

    strategy.validate()?;

    let bars = series.len();
    if let Some(indicator) = strategy
        .indicators()
        .into_iter()
        .find(|ind| ind.window() >= bars)
    {
        return Err(StratbenchError::WindowTooLong {
            name: indicator.to_string(),
            window: indicator.window(),
            bars,
        });
    }

    Ok(())
}

pub fn run_backtest(
    series: &PriceSeries,
    strategy: &StrategyKind,
    config: &BacktestConfig,
) -> Result<BacktestRun, StratbenchError> {
    let series = series.tail(config.lookback);
    validate_inputs(&series, strategy, config)?;

    info!(
        strategy = %strategy,
        bars = series.len(),
        from = %series.first_date(),
        to = %series.last_date(),
        "running backtest"
    );

    let market_returns = calculate_pct_change(&series);
    let positions = strategy.positions(&series);
    debug!(
        entries = positions.entry_count(),
        bars_in_market = positions.bars_in_market(),
        "positions generated"
    );
    if positions.bars_in_market() == 0 {
        warn!(strategy = strategy.key(), "strategy never entered the market");
    }

    let equity = simulate(
        config.initial_capital,
        &series.dates(),
        &market_returns,
        &positions,
    )?;
    let result = BacktestResult::compute(&equity, &positions, &market_returns);

    info!(
        strategy = strategy.key(),
        final_equity = result.final_strategy_equity,
        benchmark_equity = result.final_benchmark_equity,
        trades = result.trade_count,
        "backtest finished"
    );

    Ok(BacktestRun {
        strategy: strategy.clone(),
        series,
        market_returns,
        positions,
        equity,
        result,
    })
}

/// Run each strategy over the same series; stops at the first failure.
pub fn compare_strategies(
    series: &PriceSeries,
    strategies: &[StrategyKind],
    config: &BacktestConfig,
) -> Result<Vec<BacktestRun>, StratbenchError> {
    strategies
        .iter()
        .map(|strategy| run_backtest(series, strategy, config))
        .collect()
}
