pub mod chart_store;
pub mod feed;
pub mod instruments;
pub mod notify;
pub mod price_buffer;
pub mod signals;
pub mod strategy;

pub use chart_store::{ChartStore, TimeSeries};
pub use feed::{
    is_skippable, parse_tick_line, read_tick_records, FeedState, LiveFeed, TickOutcome,
};
pub use instruments::{InstrumentCache, InstrumentDirectory, InstrumentInfo};
pub use notify::{JsonLinesSink, SignalSink};
pub use price_buffer::PriceBuffer;
pub use signals::{compute_snapshot, EdgeTrigger, RegimeClassifier};
pub use strategy::{
    apply_broker_commission, build_strategy, warm_up, AdaptiveStrategy, CostConfig, CostFilter,
    Strategy, StrategyConfig, StrategyKind, ThresholdStrategy,
};
