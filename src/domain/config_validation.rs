//! Configuration loading and validation.
//!
//! Every section is read into its domain type and checked before any run.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::StratbenchError;
use crate::domain::strategy::{BollingerParams, MaCrossoverParams, StrategyKind, VcpParams};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub short_period: usize,
    pub long_period: usize,
}

fn invalid(section: &str, key: &str, reason: &str) -> StratbenchError {
    StratbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

pub fn load_backtest_config(config: &dyn ConfigPort) -> Result<BacktestConfig, StratbenchError> {
    let defaults = BacktestConfig::default();
    let initial_capital = config.get_double("backtest", "initial_capital", defaults.initial_capital)?;
    if !(initial_capital > 0.0 && initial_capital.is_finite()) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    let lookback = config.get_usize("backtest", "lookback", defaults.lookback)?;

    Ok(BacktestConfig {
        initial_capital,
        lookback,
    })
}

pub fn data_dir(config: &dyn ConfigPort) -> String {
    config
        .get_string("backtest", "data_dir")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
}

/// `override_symbol` wins over `[backtest] symbol`.
pub fn resolve_symbol(
    config: &dyn ConfigPort,
    override_symbol: Option<&str>,
) -> Result<String, StratbenchError> {
    override_symbol
        .map(str::to_string)
        .or_else(|| config.get_string("backtest", "symbol"))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| StratbenchError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        })
}

/// Build the strategy named by `override_kind` or `[strategy] kind`.
///
/// Parameters come from `[strategy]`; unset keys keep their defaults.
pub fn load_strategy(
    config: &dyn ConfigPort,
    override_kind: Option<&str>,
) -> Result<StrategyKind, StratbenchError> {
    let kind = match override_kind {
        Some(k) => k.to_string(),
        None => config
            .get_string("strategy", "kind")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| StratbenchError::ConfigMissing {
                section: "strategy".to_string(),
                key: "kind".to_string(),
            })?,
    };

    let strategy = strategy_with_params(config, StrategyKind::from_key(&kind)?)?;
    strategy.validate().map_err(|e| match e {
        StratbenchError::InvalidParameter { name, reason } => StratbenchError::ConfigInvalid {
            section: "strategy".to_string(),
            key: name,
            reason,
        },
        other => other,
    })?;
    Ok(strategy)
}

/// Overlay `[strategy]` parameters onto a default-parameter strategy.
pub fn strategy_with_params(
    config: &dyn ConfigPort,
    strategy: StrategyKind,
) -> Result<StrategyKind, StratbenchError> {
    const S: &str = "strategy";

    Ok(match strategy {
        StrategyKind::MaCrossover(d) => StrategyKind::MaCrossover(MaCrossoverParams {
            fast_period: config.get_usize(S, "fast_period", d.fast_period)?,
            slow_period: config.get_usize(S, "slow_period", d.slow_period)?,
            rsi_period: config.get_usize(S, "rsi_period", d.rsi_period)?,
            rsi_ceiling: rsi_ceiling(config, d.rsi_ceiling)?,
        }),
        StrategyKind::BollingerReversion(d) => StrategyKind::BollingerReversion(BollingerParams {
            band_period: config.get_usize(S, "band_period", d.band_period)?,
            band_width: config.get_double(S, "band_width", d.band_width)?,
            rsi_period: config.get_usize(S, "rsi_period", d.rsi_period)?,
            rsi_floor: config.get_double(S, "rsi_floor", d.rsi_floor)?,
        }),
        StrategyKind::VcpBreakout(d) => StrategyKind::VcpBreakout(VcpParams {
            trend_period: config.get_usize(S, "trend_period", d.trend_period)?,
            high_period: config.get_usize(S, "high_period", d.high_period)?,
            near_high_pct: config.get_double(S, "near_high_pct", d.near_high_pct)?,
            range_period: config.get_usize(S, "range_period", d.range_period)?,
            tightness: config.get_double(S, "tightness", d.tightness)?,
            volume_period: config.get_usize(S, "volume_period", d.volume_period)?,
            volume_mult: config.get_double(S, "volume_mult", d.volume_mult)?,
            min_return: config.get_double(S, "min_return", d.min_return)?,
            hold_bars: config.get_usize(S, "hold_bars", d.hold_bars)?,
        }),
    })
}

fn rsi_ceiling(
    config: &dyn ConfigPort,
    default: Option<f64>,
) -> Result<Option<f64>, StratbenchError> {
    match config.get_string("strategy", "rsi_ceiling") {
        Some(v) if v.trim().eq_ignore_ascii_case("none") => Ok(None),
        Some(_) => Ok(Some(config.get_double("strategy", "rsi_ceiling", 0.0)?)),
        None => Ok(default),
    }
}

pub fn load_analysis_config(config: &dyn ConfigPort) -> Result<AnalysisConfig, StratbenchError> {
    let short_period = config.get_usize("analysis", "short_period", 20)?;
    let long_period = config.get_usize("analysis", "long_period", 50)?;
    if short_period == 0 || short_period >= long_period {
        return Err(invalid(
            "analysis",
            "short_period",
            "short_period must be at least 1 and below long_period",
        ));
    }
    Ok(AnalysisConfig {
        short_period,
        long_period,
    })
}

/// Check every section; the strategy section only when a kind is configured.
pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StratbenchError> {
    load_backtest_config(config)?;
    load_analysis_config(config)?;
    if config.get_string("strategy", "kind").is_some() {
        load_strategy(config, None)?;
    }
    Ok(())
}
