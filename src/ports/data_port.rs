//! Data access port trait.

use crate::domain::error::StratbenchError;
use crate::domain::ohlcv::OhlcvBar;

/// Supplies raw bars for a symbol. Ordering and validity are checked by
/// [`PriceSeries::new`](crate::domain::ohlcv::PriceSeries::new), not here.
pub trait DataPort {
    fn fetch_prices(&self, symbol: &str) -> Result<Vec<OhlcvBar>, StratbenchError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratbenchError>;
}
