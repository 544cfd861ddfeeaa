//! Property tests for engine invariants.
//!
//! Uses proptest to verify:
//! 1. Buffer bounds: length never exceeds capacity, eviction is FIFO
//! 2. Indicator ranges: RSI within [0, 100], EMA(1) tracks price
//! 3. Band symmetry: Bollinger middle is the window mean, bands equidistant
//! 4. Regime idempotence: same window, same classification
//! 5. Candle consistency after aggregation

use adaptive_signals::services::chart_store::aggregate_ticks;
use adaptive_signals::services::signals::indicators::{bollinger, ema, rsi, DEFAULT_BAND_WIDTH};
use adaptive_signals::services::{CostConfig, CostFilter, PriceBuffer, RegimeClassifier};
use adaptive_signals::types::{PriceTick, Signal};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..1000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_series(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(arb_price(), min..max)
}

// ── 1. Buffer bounds ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn buffer_never_exceeds_capacity(
        capacity in 1usize..64,
        prices in arb_series(0, 200),
    ) {
        let mut buffer = PriceBuffer::new(capacity);
        for &price in &prices {
            buffer.push(price);
            prop_assert!(buffer.len() <= capacity);
        }

        let keep = prices.len().min(capacity);
        prop_assert_eq!(buffer.to_vec(), prices[prices.len() - keep..].to_vec());
    }

    #[test]
    fn buffer_evicts_oldest_first(prices in arb_series(5, 50)) {
        let mut buffer = PriceBuffer::new(4);
        let mut evicted = Vec::new();
        for &price in &prices {
            if let Some(old) = buffer.push(price) {
                evicted.push(old);
            }
        }
        prop_assert_eq!(evicted, prices[..prices.len() - 4].to_vec());
    }
}

// ── 2. Indicator ranges ──────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_within_bounds(prices in arb_series(2, 120), period in 1usize..30) {
        if let Some(value) = rsi(&prices, period) {
            prop_assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn rsi_of_strict_rise_is_100(start in arb_price(), len in 14usize..60) {
        let prices: Vec<f64> = (0..len).map(|i| start + i as f64 * 0.5).collect();
        prop_assert_eq!(rsi(&prices, 12), Some(100.0));
    }

    #[test]
    fn ema_period_one_is_identity(prices in arb_series(1, 100)) {
        prop_assert_eq!(ema(&prices, 1), prices.last().copied());
    }
}

// ── 3. Band symmetry ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn bollinger_bands_symmetric(prices in arb_series(20, 80), period in 2usize..20) {
        let bands = bollinger(&prices, period, DEFAULT_BAND_WIDTH).unwrap();
        let window = &prices[prices.len() - period..];
        let mean = window.iter().sum::<f64>() / period as f64;

        prop_assert!((bands.middle - mean).abs() < 1e-9);
        let upper_gap = bands.upper - bands.middle;
        let lower_gap = bands.middle - bands.lower;
        prop_assert!((upper_gap - lower_gap).abs() < 1e-9);
        prop_assert!(upper_gap >= 0.0);
    }
}

// ── 4. Regime idempotence ────────────────────────────────────────────

proptest! {
    #[test]
    fn regime_classification_is_idempotent(prices in arb_series(25, 120)) {
        let first = RegimeClassifier::classify(&prices).unwrap();
        let second = RegimeClassifier::classify(&prices).unwrap();
        prop_assert_eq!(first, second);

        let mut classifier = RegimeClassifier::new();
        prop_assert!(classifier.update(&prices));
        prop_assert!(classifier.update(&prices));
        prop_assert_eq!(classifier.state(), first);
        prop_assert!(first.volatility >= 0.0);
        prop_assert!((0.0..=1.0).contains(&first.trend_strength));
    }

    #[test]
    fn short_window_keeps_previous_regime(prices in arb_series(1, 25)) {
        let mut classifier = RegimeClassifier::new();
        let before = classifier.state();
        prop_assert!(!classifier.update(&prices));
        prop_assert_eq!(classifier.state(), before);
    }
}

// ── 5. Cost filter and candles ───────────────────────────────────────

proptest! {
    #[test]
    fn same_price_round_trip_costs_commission(
        price in arb_price(),
        commission in 0.0001..0.01_f64,
    ) {
        let mut filter = CostFilter::new(CostConfig { commission, ..CostConfig::default() });
        filter.record(Signal::Buy, price);
        let profit = filter.profit_pct(price, price);
        let expected = -2.0 * commission / (1.0 + commission);
        prop_assert!((profit - expected).abs() < 1e-12);
        prop_assert!(profit < filter.config().required_profit_margin);
    }

    #[test]
    fn aggregated_candles_consistent(
        points in prop::collection::vec((0i64..10_000, arb_price()), 1..200),
        width in prop::sample::select(vec![60i64, 300, 3600]),
    ) {
        let ticks: Vec<PriceTick> = points.iter().map(|&(t, p)| PriceTick::new(t, p)).collect();
        let candles = aggregate_ticks(&ticks, width);
        prop_assert!(!candles.is_empty());
        for candle in &candles {
            prop_assert!(candle.is_consistent());
            prop_assert_eq!(candle.time % width, 0);
        }
        for pair in candles.windows(2) {
            prop_assert!(pair[0].time < pair[1].time);
        }
    }
}
