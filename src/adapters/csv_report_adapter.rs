//! Per-bar CSV export of a backtest run.

use crate::domain::backtest::BacktestRun;
use crate::domain::error::StratbenchError;
use crate::ports::report_port::ReportPort;
use std::path::Path;
use tracing::info;

pub const HEADER: [&str; 7] = [
    "date",
    "close",
    "position",
    "market_return",
    "strategy_return",
    "strategy_equity",
    "benchmark_equity",
];

pub struct CsvReportAdapter;

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Output failures are I/O errors whatever the csv error kind.
fn write_error(path: &Path, e: csv::Error) -> StratbenchError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => StratbenchError::Io(io),
        other => StratbenchError::Io(std::io::Error::other(format!(
            "failed to write {}: {:?}",
            path.display(),
            other
        ))),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_run(&self, run: &BacktestRun, output_path: &Path) -> Result<(), StratbenchError> {
        let mut wtr = csv::Writer::from_path(output_path).map_err(|e| write_error(output_path, e))?;
        wtr.write_record(HEADER)
            .map_err(|e| write_error(output_path, e))?;

        let rows = run
            .series
            .bars()
            .iter()
            .zip(run.positions.as_slice())
            .zip(&run.market_returns.values)
            .zip(&run.equity.strategy_returns)
            .zip(run.equity.strategy.points.iter().zip(&run.equity.benchmark.points));

        for ((((bar, position), market), strategy), (strat_eq, bench_eq)) in rows {
            wtr.write_record([
                bar.date.format("%Y-%m-%d").to_string(),
                bar.close.to_string(),
                position.fraction().to_string(),
                format_optional(*market),
                format_optional(*strategy),
                strat_eq.equity.to_string(),
                bench_eq.equity.to_string(),
            ])
            .map_err(|e| write_error(output_path, e))?;
        }

        wtr.flush()?;
        info!(path = %output_path.display(), rows = run.series.len(), "wrote run series");
        Ok(())
    }
}
