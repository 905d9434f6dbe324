//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Equity curves start at the initial capital
//! 2. Strategy returns never read the same-bar position
//! 3. Rolling windows only see their own bars
//! 4. RSI stays within [0, 100]
//! 5. Trade count matches Flat → Long transitions
//! 6. Runs are deterministic

mod common;

use common::*;
use proptest::prelude::*;
use stratbench::domain::backtest::{run_backtest, BacktestConfig};
use stratbench::domain::equity::{simulate, strategy_returns};
use stratbench::domain::indicator::pct_change::calculate_pct_change;
use stratbench::domain::indicator::rsi::calculate_rsi;
use stratbench::domain::indicator::sma::calculate_sma;
use stratbench::domain::indicator::stddev::calculate_stddev;
use stratbench::domain::signal::{Position, PositionSeries};
use stratbench::domain::strategy::{BollingerParams, MaCrossoverParams, StrategyKind};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, min_len..max_len)
        .prop_map(|v| v.into_iter().map(|c| (c * 100.0).round() / 100.0).collect())
}

fn arb_positions(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(prop::bool::ANY, len)
        .prop_map(|v| v.into_iter().map(|b| if b { 1.0 } else { 0.0 }).collect())
}

fn arb_strategy() -> impl Strategy<Value = StrategyKind> {
    prop_oneof![
        (2..8usize, 9..20usize, 2..15usize).prop_map(|(fast, slow, rsi)| {
            StrategyKind::MaCrossover(MaCrossoverParams {
                fast_period: fast,
                slow_period: slow,
                rsi_period: rsi,
                rsi_ceiling: Some(70.0),
            })
        }),
        (2..20usize, 1.0..3.0_f64, 2..15usize).prop_map(|(band, width, rsi)| {
            StrategyKind::BollingerReversion(BollingerParams {
                band_period: band,
                band_width: width,
                rsi_period: rsi,
                rsi_floor: 35.0,
            })
        }),
    ]
}

fn config() -> BacktestConfig {
    BacktestConfig {
        initial_capital: 10_000.0,
        lookback: 0,
    }
}

// ── 1. Equity starts at capital ──────────────────────────────────────

proptest! {
    #[test]
    fn equity_starts_at_initial_capital(
        closes in arb_closes(30, 80),
        strategy in arb_strategy(),
        capital in 1.0..1_000_000.0_f64,
    ) {
        let series = make_series(&closes);
        let cfg = BacktestConfig { initial_capital: capital, lookback: 0 };
        let run = run_backtest(&series, &strategy, &cfg).unwrap();
        prop_assert_eq!(run.equity.strategy.points[0].equity, capital);
        prop_assert_eq!(run.equity.benchmark.points[0].equity, capital);
        prop_assert!(run.equity.strategy.values().iter().all(|v| v.is_finite() && *v > 0.0));
    }
}

// ── 2. No look-ahead in the simulator ────────────────────────────────

proptest! {
    /// Flipping position[i] never changes strategy_return[i].
    #[test]
    fn same_bar_position_does_not_leak(
        (closes, fractions) in arb_closes(5, 60)
            .prop_flat_map(|c| { let n = c.len(); (Just(c), arb_positions(n)) }),
        flip in any::<prop::sample::Index>(),
    ) {
        let series = make_series(&closes);
        let returns = calculate_pct_change(&series);
        let original = PositionSeries::from_fractions(&fractions);

        let i = flip.index(fractions.len());
        let mut mutated = fractions.clone();
        mutated[i] = 1.0 - mutated[i];
        let mutated = PositionSeries::from_fractions(&mutated);

        let a = strategy_returns(&original, &returns);
        let b = strategy_returns(&mutated, &returns);
        prop_assert_eq!(a[i], b[i]);
        prop_assert_eq!(&a[..=i], &b[..=i]);
    }

    #[test]
    fn flat_positions_keep_capital(closes in arb_closes(2, 60)) {
        let series = make_series(&closes);
        let returns = calculate_pct_change(&series);
        let flat = PositionSeries::new(vec![Position::Flat; closes.len()]);
        let sim = simulate(500.0, &series.dates(), &returns, &flat).unwrap();
        prop_assert!(sim.strategy.values().iter().all(|&v| v == 500.0));
    }
}

// ── 3. Rolling window locality ───────────────────────────────────────

proptest! {
    /// Changing a close outside [i + 1 - w, i] leaves SMA/STD at i unchanged.
    #[test]
    fn rolling_stats_ignore_bars_outside_window(
        closes in arb_closes(25, 60),
        window in 2..10usize,
        bump in 1.0..50.0_f64,
    ) {
        let series = make_series(&closes);
        let sma = calculate_sma(&series, window);
        let std = calculate_stddev(&series, window);

        let target = closes.len() - 1;
        let outside = target - window;
        let mut changed = closes.clone();
        changed[outside] += bump;
        let changed_series = make_series(&changed);

        prop_assert_eq!(calculate_sma(&changed_series, window).get(target), sma.get(target));
        prop_assert_eq!(calculate_stddev(&changed_series, window).get(target), std.get(target));
        for i in 0..window - 1 {
            prop_assert_eq!(sma.get(i), None);
        }
    }
}

// ── 4. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(closes in arb_closes(2, 80), period in 1..20usize) {
        let rsi = calculate_rsi(&make_series(&closes), period);
        for value in rsi.values.iter().flatten() {
            prop_assert!((0.0..=100.0).contains(value), "rsi {} out of range", value);
        }
        if closes.len() > period {
            prop_assert!(rsi.get(period).is_some());
        }
    }

    #[test]
    fn rsi_is_one_hundred_without_losses(start in 1.0..100.0_f64, n in 16..40usize) {
        let closes: Vec<f64> = (0..n).map(|i| start + i as f64).collect();
        let rsi = calculate_rsi(&make_series(&closes), 14);
        prop_assert_eq!(rsi.last(), Some(100.0));
    }
}

// ── 5/6. Position domain, trade count, determinism ───────────────────

proptest! {
    #[test]
    fn trade_count_matches_transitions(
        closes in arb_closes(30, 80),
        strategy in arb_strategy(),
    ) {
        let series = make_series(&closes);
        let run = run_backtest(&series, &strategy, &config()).unwrap();

        let fractions = run.positions.fractions();
        prop_assert_eq!(fractions.len(), closes.len());
        prop_assert!(fractions.iter().all(|&f| f == 0.0 || f == 1.0));

        let entries = fractions.windows(2).filter(|w| w[0] == 0.0 && w[1] == 1.0).count();
        prop_assert_eq!(run.result.trade_count, entries);
        let in_market = fractions.iter().filter(|&&f| f == 1.0).count();
        prop_assert_eq!(run.result.bars_in_market, in_market);
    }

    #[test]
    fn runs_are_deterministic(
        closes in arb_closes(30, 80),
        strategy in arb_strategy(),
    ) {
        let series = make_series(&closes);
        let first = run_backtest(&series, &strategy, &config()).unwrap();
        let second = run_backtest(&series, &strategy, &config()).unwrap();
        prop_assert_eq!(first, second);
    }
}
