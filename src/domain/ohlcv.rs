//! OHLCV bar representation and the validated price series fed to the engine.

use crate::domain::error::StratbenchError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// high - low, the simplified true range used by the ATR proxy.
    pub fn range(&self) -> f64 {
        self.high - self.low
    }

    fn check(&self, index: usize) -> Result<(), StratbenchError> {
        let invalid = |reason: &str| StratbenchError::InvalidBar {
            index,
            date: self.date,
            reason: reason.to_string(),
        };

        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if fields.iter().any(|v| !v.is_finite()) {
            return Err(invalid("non-finite price or volume"));
        }
        if self.close <= 0.0 {
            return Err(invalid("non-positive close"));
        }
        if self.volume < 0.0 {
            return Err(invalid("negative volume"));
        }
        if self.high < self.low {
            return Err(invalid("high below low"));
        }
        Ok(())
    }
}

/// An immutable, date-ascending sequence of bars.
///
/// Construction is the only validation point: once a `PriceSeries` exists it is
/// non-empty, strictly increasing by date, and every bar has a positive close,
/// non-negative volume and `high >= low`. Closes outside `[low, high]` are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, StratbenchError> {
        if bars.is_empty() {
            return Err(StratbenchError::EmptySeries);
        }

        for (i, bar) in bars.iter().enumerate() {
            bar.check(i)?;
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(StratbenchError::UnsortedTimestamps {
                    index: i,
                    previous: bars[i - 1].date,
                    current: bar.date,
                });
            }
        }

        Ok(Self { bars })
    }

    /// The most recent `n` bars. `n == 0` or `n >= len` keeps the whole series.
    pub fn tail(&self, n: usize) -> PriceSeries {
        if n == 0 || n >= self.bars.len() {
            return self.clone();
        }
        PriceSeries {
            bars: self.bars[self.bars.len() - n..].to_vec(),
        }
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn ranges(&self) -> Vec<f64> {
        self.bars.iter().map(OhlcvBar::range).collect()
    }
}
