//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{compare_strategies, run_backtest, BacktestConfig, BacktestRun};
use crate::domain::config_validation::{
    data_dir, load_analysis_config, load_backtest_config, load_strategy, resolve_symbol,
    strategy_with_params, validate_config,
};
use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::{signal_events, SignalKind};
use crate::domain::strategy::StrategyKind;
use crate::domain::trend::TrendSnapshot;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "stratbench", about = "Rule-based strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest one strategy against buy-and-hold
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Strategy kind, overriding [strategy] kind
        #[arg(long)]
        strategy: Option<String>,
        /// Write per-bar series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Backtest every strategy over the same series
    Compare {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Show the latest trend snapshot
    Analyze {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols with price files in the data directory
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(command: Command) -> Result<(), StratbenchError> {
    match command {
        Command::Backtest {
            config,
            symbol,
            strategy,
            output,
        } => run_backtest_command(
            &config,
            symbol.as_deref(),
            strategy.as_deref(),
            output.as_deref(),
        ),
        Command::Compare { config, symbol } => run_compare(&config, symbol.as_deref()),
        Command::Analyze { config, symbol } => run_analyze(&config, symbol.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { config } => run_list_symbols(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, StratbenchError> {
    info!(path = %path.display(), "loading config");
    FileConfigAdapter::from_file(path)
}

fn data_port(config: &dyn ConfigPort) -> CsvAdapter {
    CsvAdapter::new(PathBuf::from(data_dir(config)))
}

/// Fetch and validate a symbol's bars.
pub fn load_series(data_port: &dyn DataPort, symbol: &str) -> Result<PriceSeries, StratbenchError> {
    let bars = data_port.fetch_prices(symbol)?;
    let series = PriceSeries::new(bars)?;
    info!(
        symbol,
        bars = series.len(),
        from = %series.first_date(),
        to = %series.last_date(),
        "loaded price series"
    );
    Ok(series)
}

/// Load, run and optionally export a single backtest.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    strategy: &StrategyKind,
    config: &BacktestConfig,
    output_path: Option<&Path>,
) -> Result<BacktestRun, StratbenchError> {
    let series = load_series(data_port, symbol)?;
    let run = run_backtest(&series, strategy, config)?;
    if let Some(path) = output_path {
        CsvReportAdapter.write_run(&run, path)?;
    }
    Ok(run)
}

fn run_backtest_command(
    config_path: &Path,
    symbol: Option<&str>,
    strategy: Option<&str>,
    output: Option<&Path>,
) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    let bt_config = load_backtest_config(&adapter)?;
    let strategy = load_strategy(&adapter, strategy)?;
    let symbol = resolve_symbol(&adapter, symbol)?;
    info!(%strategy, symbol = %symbol, "strategy selected");

    let run = run_backtest_pipeline(&data_port(&adapter), &symbol, &strategy, &bt_config, output)?;
    print_run(&symbol, &run);
    Ok(())
}

fn run_compare(config_path: &Path, symbol: Option<&str>) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    let bt_config = load_backtest_config(&adapter)?;
    let symbol = resolve_symbol(&adapter, symbol)?;

    let strategies = StrategyKind::KEYS
        .iter()
        .map(|key| strategy_with_params(&adapter, StrategyKind::from_key(key)?))
        .collect::<Result<Vec<_>, _>>()?;

    let series = load_series(&data_port(&adapter), &symbol)?;
    let runs = compare_strategies(&series, &strategies, &bt_config)?;
    print_comparison(&symbol, &runs);
    Ok(())
}

fn run_analyze(config_path: &Path, symbol: Option<&str>) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    let bt_config = load_backtest_config(&adapter)?;
    let analysis = load_analysis_config(&adapter)?;
    let symbol = resolve_symbol(&adapter, symbol)?;

    let series = load_series(&data_port(&adapter), &symbol)?.tail(bt_config.lookback);
    let snap = TrendSnapshot::compute(&series, analysis.short_period, analysis.long_period)?;

    let ma = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |x| format!("{:.2}", x));
    println!("=== {} Trend Snapshot ===", symbol);
    println!("Period:           {} to {} ({} bars)", snap.first_date, snap.last_date, snap.bars);
    println!("Last Close:       {:.2}", snap.last_close);
    println!("SMA({}):          {}", snap.short_period, ma(snap.short_ma));
    println!("SMA({}):          {}", snap.long_period, ma(snap.long_ma));
    println!("Volatility (ann): {:.2}%", snap.annualized_volatility * 100.0);
    println!("Trend:            {}", snap.trend);
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    validate_config(&adapter)?;
    println!("Configuration is valid: {}", config_path.display());
    Ok(())
}

fn run_list_symbols(config_path: &Path) -> Result<(), StratbenchError> {
    let adapter = load_config(config_path)?;
    let symbols = data_port(&adapter).list_symbols()?;
    debug!(count = symbols.len(), "symbols found");
    for symbol in symbols {
        println!("{}", symbol);
    }
    Ok(())
}

fn print_run(symbol: &str, run: &BacktestRun) {
    let r = &run.result;
    println!("=== {} | {} ===", symbol, run.strategy);
    println!(
        "Period:             {} to {} ({} bars)",
        run.series.first_date(),
        run.series.last_date(),
        run.series.len()
    );
    println!("Final Equity:       {:.2}", r.final_strategy_equity);
    println!("Total Return:       {:.2}%", r.total_strategy_return * 100.0);
    println!("Buy & Hold Equity:  {:.2}", r.final_benchmark_equity);
    println!("Buy & Hold Return:  {:.2}%", r.total_benchmark_return * 100.0);
    println!(
        "Max Drawdown:       -{:.1}% (buy & hold -{:.1}%)",
        r.strategy_max_drawdown * 100.0,
        r.benchmark_max_drawdown * 100.0
    );
    println!(
        "Volatility (ann):   {:.2}% (strategy {:.2}%)",
        r.realized_volatility * 100.0,
        r.strategy_volatility * 100.0
    );
    println!("Trades:             {}", r.trade_count);
    println!("Bars in Market:     {}", r.bars_in_market);

    let events = signal_events(&run.positions, &run.series);
    if let Some(last) = events.last() {
        let kind = match last.kind {
            SignalKind::Buy => "buy",
            SignalKind::Sell => "sell",
        };
        println!("Last Signal:        {} on {} at {:.2}", kind, last.date, last.close);
    }
}

fn print_comparison(symbol: &str, runs: &[BacktestRun]) {
    println!("=== {} Strategy Comparison ===", symbol);
    println!(
        "{:<22} {:>14} {:>10} {:>8} {:>10}",
        "Strategy", "Final Equity", "Return", "Trades", "Max DD"
    );
    for run in runs {
        let r = &run.result;
        println!(
            "{:<22} {:>14.2} {:>9.2}% {:>8} {:>9.1}%",
            run.strategy.key(),
            r.final_strategy_equity,
            r.total_strategy_return * 100.0,
            r.trade_count,
            r.strategy_max_drawdown * 100.0
        );
    }
    if let Some(first) = runs.first() {
        let r = &first.result;
        println!(
            "{:<22} {:>14.2} {:>9.2}% {:>8} {:>9.1}%",
            "buy_and_hold",
            r.final_benchmark_equity,
            r.total_benchmark_return * 100.0,
            "-",
            r.benchmark_max_drawdown * 100.0
        );
    }
}
