//! Report output port trait.

use crate::domain::backtest::BacktestRun;
use crate::domain::error::StratbenchError;
use std::path::Path;

/// Port for persisting a completed run for charting or inspection.
pub trait ReportPort {
    fn write_run(&self, run: &BacktestRun, output_path: &Path) -> Result<(), StratbenchError>;
}
