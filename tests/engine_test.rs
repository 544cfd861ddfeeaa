//! End-to-end tests for the signal pipeline

use adaptive_signals::services::signals::indicators::{bollinger, ema, rsi, DEFAULT_BAND_WIDTH};
use adaptive_signals::services::signals::{compute_snapshot, decide, score, RegimeClassifier};
use adaptive_signals::services::{
    build_strategy, warm_up, AdaptiveStrategy, ChartStore, CostConfig, CostFilter, EdgeTrigger,
    Strategy, StrategyConfig,
};
use adaptive_signals::types::{
    AdaptiveParams, Backfill, Candle, ChartResolution, IndicatorSnapshot, MarketRegime, PriceTick,
    Signal, SignalStats,
};

fn rising() -> Vec<f64> {
    (90..115).map(|p| p as f64).collect()
}

fn feed(strategy: &mut dyn Strategy, prices: &[f64]) -> Vec<Signal> {
    prices.iter().filter_map(|&p| strategy.analyze(p)).collect()
}

#[test]
fn test_rising_scenario_indicators() {
    let prices = rising();
    let state = RegimeClassifier::classify(&prices).unwrap();
    assert_eq!(state.regime, MarketRegime::Bullish);

    let params = AdaptiveParams::for_regime(&state);
    assert_eq!((params.ema_fast, params.ema_slow, params.ema_trend), (5, 12, 25));

    assert_eq!(rsi(&prices, params.rsi_period), Some(100.0));
    let fast = ema(&prices, params.ema_fast).unwrap();
    let slow = ema(&prices, params.ema_slow).unwrap();
    let trend = ema(&prices, params.ema_trend).unwrap();
    assert!(fast > slow && slow > trend);
}

#[test]
fn test_rising_scenario_scores_buy() {
    let prices = rising();
    let state = RegimeClassifier::classify(&prices).unwrap();
    let snapshot = compute_snapshot(&prices, &AdaptiveParams::for_regime(&state)).unwrap();

    assert!(snapshot.macd > 0.0);
    assert!(snapshot.momentum > 0.0);
    let card = score(&snapshot, state.regime);
    assert!(card.buy >= 4);
    assert!(card.buy > card.sell);
    assert_eq!(decide(Some(&snapshot), state.regime), Some(Signal::Buy));
}

#[test]
fn test_bollinger_matches_mean() {
    let prices = rising();
    let bands = bollinger(&prices, 16, DEFAULT_BAND_WIDTH).unwrap();
    let mean = prices[prices.len() - 16..].iter().sum::<f64>() / 16.0;
    assert!((bands.middle - mean).abs() < 1e-12);
    assert!((bands.upper - 114.7977).abs() < 1e-3);
}

#[test]
fn test_each_strategy_over_rising_series() {
    let mut adaptive = build_strategy(&StrategyConfig::adaptive());
    assert_eq!(feed(adaptive.as_mut(), &rising()), vec![Signal::Buy]);

    let mut cost_aware = build_strategy(&StrategyConfig::default());
    assert_eq!(feed(cost_aware.as_mut(), &rising()), vec![Signal::Buy]);
    assert!(cost_aware.position().unwrap().is_long());

    // Every +1 step is well over 0.1%.
    let mut threshold = build_strategy(&StrategyConfig::threshold());
    assert_eq!(feed(threshold.as_mut(), &rising()).len(), 24);
}

#[test]
fn test_round_trip_at_same_price_is_held() {
    let commission = 0.0005;
    let mut filter = CostFilter::new(CostConfig {
        commission,
        ..CostConfig::default()
    });
    filter.record(Signal::Buy, 100.0);

    let profit = filter.profit_pct(100.0, 100.0);
    assert!((profit - (-2.0 * commission / (1.0 + commission))).abs() < 1e-12);

    let snapshot = IndicatorSnapshot {
        price: 100.0,
        ema_fast: 100.0,
        ema_slow: 100.0,
        ema_trend: 100.0,
        rsi: 50.0,
        bb_upper: 105.0,
        bb_middle: 100.0,
        bb_lower: 95.0,
        macd: 0.0,
        macd_signal: 0.0,
        macd_hist: 0.0,
        stoch_k: 50.0,
        stoch_d: 50.0,
        momentum: 0.0,
    };
    assert_eq!(filter.filter(Some(Signal::Sell), 100.0, &snapshot), None);
    assert_eq!(filter.filter(Some(Signal::Sell), 100.2, &snapshot), None);
    assert!(filter.position().is_long());
}

#[test]
fn test_edge_trigger_swallows_repeat() {
    let mut trigger = EdgeTrigger::new();
    assert_eq!(trigger.surface(Some(Signal::Sell)), Some(Signal::Sell));
    assert_eq!(trigger.surface(Some(Signal::Sell)), None);
}

#[test]
fn test_warm_up_then_live_signal() {
    // History supplies the first 24 closes; the 25th live price completes the window.
    let prices = rising();
    let candles: Vec<Candle> = prices[..24]
        .iter()
        .enumerate()
        .map(|(i, &p)| Candle::from_price(i as i64 * 60, p))
        .collect();

    let mut strategy = build_strategy(&StrategyConfig::default());
    assert_eq!(warm_up(strategy.as_mut(), &candles), 24);
    assert!(strategy.summary().is_empty());
    assert_eq!(strategy.analyze(prices[24]), Some(Signal::Buy));
}

#[test]
fn test_warm_up_includes_open_backfill_minute() {
    let ticks: Vec<PriceTick> = rising()
        .iter()
        .enumerate()
        .map(|(i, &p)| PriceTick::new(i as i64 * 60, p))
        .collect();
    let mut store = ChartStore::default();
    store.install_history(&Backfill::Ticks(ticks));
    assert_eq!(store.history(ChartResolution::OneMinute).len(), 24);

    let candles = store.display_candles(ChartResolution::OneMinute);
    let mut strategy = build_strategy(&StrategyConfig::default());
    assert_eq!(warm_up(strategy.as_mut(), &candles), 25);
    assert_eq!(strategy.indicator_snapshot().unwrap().price, 114.0);
    assert!(!strategy.summary().is_empty());
}

#[test]
fn test_rise_and_fall_session() {
    let mut prices = rising();
    prices.extend((96..114).rev().map(|p| p as f64));

    let mut strategy = AdaptiveStrategy::cost_aware(1000, CostConfig::default());
    let mut stats = SignalStats::default();
    for &price in &prices {
        if let Some(signal) = strategy.analyze(price) {
            stats.record(signal);
        }
    }

    assert_eq!(stats.buy, 1);
    assert_eq!(stats.sell, 1);
    assert_eq!(stats.total, 2);

    let position = strategy.position().unwrap();
    assert!(position.is_flat());
    assert_eq!(position.trade_count, 1);
    let expected_commission = (114.0 + 100.0) * 0.0005;
    assert!((position.total_commission - expected_commission).abs() < 1e-9);
}

#[test]
fn test_summary_serializes_for_display() {
    let mut strategy = build_strategy(&StrategyConfig::default());
    feed(strategy.as_mut(), &rising());

    let json = serde_json::to_value(strategy.summary()).unwrap();
    assert_eq!(json["regime"], "BULLISH");
    assert_eq!(json["position"], "LONG");
    assert_eq!(json["rsi"], 100.0);
    assert!(json.get("lastPrice").is_none());
}

#[test]
fn test_strategy_switch_resets_state() {
    let mut strategy = build_strategy(&StrategyConfig::default());
    feed(strategy.as_mut(), &rising());
    strategy.reset();
    assert_eq!(strategy.price_count(), 0);
    assert!(strategy.position().unwrap().is_flat());
    assert!(strategy.indicator_snapshot().is_none());
}
