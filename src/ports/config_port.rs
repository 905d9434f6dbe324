//! Configuration access port trait.

use crate::domain::error::StratbenchError;
use std::str::FromStr;

/// Typed getters fall back to `default` when a key is absent or blank; a
/// present value that does not parse is a `ConfigInvalid` error.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;

    fn get_usize(&self, section: &str, key: &str, default: usize) -> Result<usize, StratbenchError> {
        parse_or(self.get_string(section, key), section, key, default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> Result<f64, StratbenchError> {
        parse_or(self.get_string(section, key), section, key, default)
    }
}

fn parse_or<T: FromStr>(
    raw: Option<String>,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, StratbenchError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    raw.trim().parse().map_err(|_| StratbenchError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("cannot parse {:?}", raw.trim()),
    })
}
