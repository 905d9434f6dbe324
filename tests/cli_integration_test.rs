//! CLI integration tests with real INI and CSV files on disk.

mod common;

use clap::Parser;
use common::*;
use std::fs;
use std::io::Write;
use std::path::Path;
use stratbench::cli::{execute, Cli, Command};
use stratbench::domain::error::StratbenchError;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// Data directory holding `AAPL_prices.csv` with `n` oscillating bars.
fn data_dir_with(n: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    let csv = bars_to_csv(&make_bars(&wave_closes(n)));
    fs::write(dir.path().join("AAPL_prices.csv"), csv).unwrap();
    dir
}

fn ini_for(data_dir: &Path, strategy_section: &str) -> String {
    format!(
        "[backtest]\ninitial_capital = 10000\nlookback = 0\ndata_dir = {}\nsymbol = aapl\n\n{}",
        data_dir.display(),
        strategy_section
    )
}

fn parse(args: &[&str]) -> Command {
    let mut argv = vec!["stratbench"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap().command
}

mod parsing {
    use super::*;

    #[test]
    fn backtest_flags() {
        match parse(&["backtest", "-c", "run.ini", "--symbol", "MSFT", "--strategy", "vcp_breakout", "-o", "out.csv"]) {
            Command::Backtest {
                config,
                symbol,
                strategy,
                output,
            } => {
                assert_eq!(config, Path::new("run.ini"));
                assert_eq!(symbol.as_deref(), Some("MSFT"));
                assert_eq!(strategy.as_deref(), Some("vcp_breakout"));
                assert_eq!(output.as_deref(), Some(Path::new("out.csv")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn list_symbols_is_kebab_case() {
        assert!(matches!(
            parse(&["list-symbols", "-c", "run.ini"]),
            Command::ListSymbols { .. }
        ));
    }

    #[test]
    fn config_is_required() {
        assert!(Cli::try_parse_from(["stratbench", "compare"]).is_err());
    }
}

mod commands {
    use super::*;

    #[test]
    fn backtest_writes_run_series() {
        let data = data_dir_with(120);
        let ini = write_temp_ini(&ini_for(data.path(), "[strategy]\nkind = bollinger_reversion\n"));
        let out = data.path().join("run.csv");

        execute(Command::Backtest {
            config: ini.path().to_path_buf(),
            symbol: None,
            strategy: None,
            output: Some(out.clone()),
        })
        .unwrap();

        let content = fs::read_to_string(&out).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("date,close,position,market_return,strategy_return,strategy_equity,benchmark_equity")
        );
        assert_eq!(lines.count(), 120);
    }

    #[test]
    fn strategy_flag_overrides_config() {
        let data = data_dir_with(120);
        let ini = write_temp_ini(&ini_for(data.path(), "[strategy]\nkind = bollinger_reversion\n"));

        let err = execute(parse(&[
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "--strategy",
            "martingale",
        ]))
        .unwrap_err();
        assert!(matches!(err, StratbenchError::UnknownStrategy(_)));
        assert_eq!(err.exit_status(), 4);
    }

    #[test]
    fn backtest_reports_short_history() {
        let data = data_dir_with(120);
        let ini = write_temp_ini(&ini_for(data.path(), "[strategy]\nkind = vcp_breakout\n"));

        let err = execute(parse(&["backtest", "-c", ini.path().to_str().unwrap()])).unwrap_err();
        assert!(matches!(err, StratbenchError::WindowTooLong { .. }));
        assert_eq!(err.exit_status(), 5);
    }

    #[test]
    fn missing_symbol_file_is_data_error() {
        let data = data_dir_with(120);
        let ini = write_temp_ini(&ini_for(data.path(), "[strategy]\nkind = ma_crossover\n"));

        let err = execute(parse(&[
            "backtest",
            "-c",
            ini.path().to_str().unwrap(),
            "--symbol",
            "ZZZZ",
        ]))
        .unwrap_err();
        assert_eq!(err.exit_status(), 3);
    }

    #[test]
    fn compare_runs_all_strategies() {
        let data = data_dir_with(300);
        let ini = write_temp_ini(&ini_for(data.path(), ""));
        execute(parse(&["compare", "-c", ini.path().to_str().unwrap()])).unwrap();
    }

    #[test]
    fn analyze_prints_snapshot() {
        let data = data_dir_with(80);
        let ini = write_temp_ini(&ini_for(data.path(), "[analysis]\nshort_period = 10\nlong_period = 30\n"));
        execute(parse(&["analyze", "-c", ini.path().to_str().unwrap()])).unwrap();
    }

    #[test]
    fn list_symbols_reads_data_dir() {
        let data = data_dir_with(10);
        fs::write(data.path().join("MSFT_prices.csv"), "Date,Open,High,Low,Close,Volume\n").unwrap();
        let ini = write_temp_ini(&ini_for(data.path(), ""));
        execute(parse(&["list-symbols", "-c", ini.path().to_str().unwrap()])).unwrap();
    }

    #[test]
    fn validate_accepts_good_config() {
        let data = data_dir_with(10);
        let ini = write_temp_ini(&ini_for(
            data.path(),
            "[strategy]\nkind = vcp_breakout\nhold_bars = 5\n",
        ));
        execute(parse(&["validate", "-c", ini.path().to_str().unwrap()])).unwrap();
    }

    #[test]
    fn validate_rejects_bad_strategy_params() {
        let data = data_dir_with(10);
        let ini = write_temp_ini(&ini_for(
            data.path(),
            "[strategy]\nkind = ma_crossover\nfast_period = 50\nslow_period = 20\n",
        ));
        let err = execute(parse(&["validate", "-c", ini.path().to_str().unwrap()])).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigInvalid { .. }));
        assert_eq!(err.exit_status(), 2);
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = execute(parse(&["validate", "-c", "/nonexistent/stratbench.ini"])).unwrap_err();
        assert!(matches!(err, StratbenchError::ConfigParse { .. }));
    }
}
