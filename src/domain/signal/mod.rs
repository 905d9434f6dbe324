//! Position signal generation.
//!
//! Each strategy variant implements [`SignalRule`]: given a bar index and the
//! state carried from the previous bar, decide the position held during that
//! bar. [`generate_positions`] folds a rule over the bars in ascending order,
//! threading the rule's own state; variants never share state.

pub mod bollinger_reversion;
pub mod ma_crossover;
pub mod vcp_breakout;

use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Position {
    #[default]
    Flat,
    Long,
}

impl Position {
    /// Fraction of capital held: 0.0 or 1.0.
    pub fn fraction(self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long => 1.0,
        }
    }

    pub fn from_flag(long: bool) -> Self {
        if long { Position::Long } else { Position::Flat }
    }
}

pub trait SignalRule {
    type State: Copy + Default;

    fn bar_count(&self) -> usize;

    /// Decide bar `index` using only information at or before its close.
    fn decide(&self, index: usize, state: Self::State) -> (Position, Self::State);
}

pub fn generate_positions<R: SignalRule>(rule: &R) -> PositionSeries {
    let positions = (0..rule.bar_count())
        .scan(R::State::default(), |state, i| {
            let (position, next) = rule.decide(i, *state);
            *state = next;
            Some(position)
        })
        .collect();
    PositionSeries { positions }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSeries {
    positions: Vec<Position>,
}

impl PositionSeries {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn from_fractions(fractions: &[f64]) -> Self {
        Self::new(fractions.iter().map(|&f| Position::from_flag(f > 0.0)).collect())
    }

    pub fn get(&self, index: usize) -> Option<Position> {
        self.positions.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[Position] {
        &self.positions
    }

    pub fn fractions(&self) -> Vec<f64> {
        self.positions.iter().map(|p| p.fraction()).collect()
    }

    /// Number of Flat → Long transitions between consecutive bars.
    pub fn entry_count(&self) -> usize {
        self.positions
            .windows(2)
            .filter(|w| w[0] == Position::Flat && w[1] == Position::Long)
            .count()
    }

    pub fn bars_in_market(&self) -> usize {
        self.positions.iter().filter(|&&p| p == Position::Long).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignalEvent {
    pub index: usize,
    pub date: NaiveDate,
    pub close: f64,
    pub kind: SignalKind,
}

/// Position changes as chart markers: Buy on Flat → Long, Sell on Long → Flat.
pub fn signal_events(positions: &PositionSeries, series: &PriceSeries) -> Vec<SignalEvent> {
    let bars = series.bars();
    positions
        .as_slice()
        .windows(2)
        .enumerate()
        .filter_map(|(i, w)| {
            let kind = match (w[0], w[1]) {
                (Position::Flat, Position::Long) => SignalKind::Buy,
                (Position::Long, Position::Flat) => SignalKind::Sell,
                _ => return None,
            };
            let bar = bars.get(i + 1)?;
            Some(SignalEvent {
                index: i + 1,
                date: bar.date,
                close: bar.close,
                kind,
            })
        })
        .collect()
}
