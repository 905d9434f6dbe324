//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stratbench.
#[derive(Debug, thiserror::Error)]
pub enum StratbenchError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("timestamps not strictly increasing at bar {index}: {previous} then {current}")]
    UnsortedTimestamps {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("invalid bar {index} ({date}): {reason}")]
    InvalidBar {
        index: usize,
        date: NaiveDate,
        reason: String,
    },

    #[error("initial capital must be positive, got {value}")]
    InvalidCapital { value: f64 },

    #[error("{name} window of {window} bars needs a longer series (have {bars} bars)")]
    WindowTooLong {
        name: String,
        window: usize,
        bars: usize,
    },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("unknown strategy kind: {0}")]
    UnknownStrategy(String),

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StratbenchError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            StratbenchError::Io(_) => 1,
            StratbenchError::ConfigParse { .. }
            | StratbenchError::ConfigMissing { .. }
            | StratbenchError::ConfigInvalid { .. } => 2,
            StratbenchError::DataSource { .. } => 3,
            StratbenchError::UnknownStrategy(_) | StratbenchError::InvalidParameter { .. } => 4,
            StratbenchError::EmptySeries
            | StratbenchError::UnsortedTimestamps { .. }
            | StratbenchError::InvalidBar { .. }
            | StratbenchError::InvalidCapital { .. }
            | StratbenchError::WindowTooLong { .. } => 5,
        }
    }
}

impl From<&StratbenchError> for std::process::ExitCode {
    fn from(err: &StratbenchError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
