//! Candle aggregation and multi-resolution chart history.

use crate::services::strategy::is_valid_price;
use crate::types::{bucket_start, Backfill, Candle, ChartResolution, PriceTick};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Sealed candles retained per resolution.
pub const DEFAULT_HISTORY_LIMIT: usize = 500;

/// Ticks per candle in the run-quantization fallback.
pub const QUANTIZE_RUN: usize = 4;

/// Fold candle-shaped items into time buckets of `bucket_seconds`.
///
/// Items are sorted by time first; upstream order is not trusted. The last
/// bucket is sealed too, since the input is a finite batch.
fn fold_into_buckets(mut items: Vec<Candle>, bucket_seconds: i64) -> Vec<Candle> {
    items.sort_by_key(|c| c.time);

    let mut sealed = Vec::new();
    let mut open: Option<Candle> = None;
    for item in &items {
        let bucket = bucket_start(item.time, bucket_seconds);
        if let Some(candle) = open.as_mut().filter(|c| c.time == bucket) {
            candle.merge(item);
            continue;
        }
        if let Some(done) = open.replace(Candle::from_sub_candle(bucket, item)) {
            sealed.push(done);
        }
    }
    sealed.extend(open);
    sealed
}

/// Bucket raw `(timestamp, price)` ticks into candles.
pub fn aggregate_ticks(ticks: &[PriceTick], bucket_seconds: i64) -> Vec<Candle> {
    let items = ticks
        .iter()
        .filter(|t| is_valid_price(t.price))
        .map(|t| Candle::from_price(t.time, t.price))
        .collect();
    fold_into_buckets(items, bucket_seconds)
}

/// Merge finer OHLC candles into coarser buckets, keeping sub-candle extremes.
pub fn aggregate_candles(candles: &[Candle], bucket_seconds: i64) -> Vec<Candle> {
    fold_into_buckets(candles.to_vec(), bucket_seconds)
}

/// 5-second bars to 1-minute candles.
pub fn convert_5sec_to_1min(candles: &[Candle]) -> Vec<Candle> {
    aggregate_candles(candles, ChartResolution::OneMinute.seconds())
}

/// Group ticks into fixed runs of [`QUANTIZE_RUN`] in arrival order.
///
/// This is an approximation for sources without usable timestamps, not time
/// bucketing: each candle is stamped with its first tick's time and an
/// incomplete trailing run is dropped. Prefer [`aggregate_ticks`].
pub fn quantize_runs(ticks: &[PriceTick]) -> Vec<Candle> {
    ticks
        .chunks_exact(QUANTIZE_RUN)
        .map(|run| {
            let mut candle = Candle::from_price(run[0].time, run[0].price);
            for tick in &run[1..] {
                candle.update(tick.price);
            }
            candle
        })
        .collect()
}

/// Sealed history plus the open candle for one resolution.
#[derive(Debug, Clone)]
pub struct TimeSeries {
    resolution: ChartResolution,
    history: VecDeque<Candle>,
    current: Option<Candle>,
    limit: usize,
}

impl TimeSeries {
    pub fn new(resolution: ChartResolution, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            resolution,
            history: VecDeque::with_capacity(limit),
            current: None,
            limit,
        }
    }

    pub fn resolution(&self) -> ChartResolution {
        self.resolution
    }

    /// Replace contents with an aggregated batch. The newest candle stays open
    /// so live ticks in the same bucket extend it instead of duplicating it.
    fn install(&mut self, mut candles: Vec<Candle>) {
        self.history.clear();
        self.current = candles.pop();
        for candle in candles {
            self.seal(candle);
        }
    }

    /// Whether `time` falls in a bucket older than the open candle.
    fn is_stale(&self, time: i64) -> bool {
        self.current
            .map(|c| self.resolution.bucket_start(time) < c.time)
            .unwrap_or(false)
    }

    /// Fold a live tick. Returns the candle sealed by a bucket change, if any.
    fn add_tick(&mut self, time: i64, price: f64) -> Option<Candle> {
        let bucket = self.resolution.bucket_start(time);
        if let Some(candle) = self.current.as_mut().filter(|c| c.time == bucket) {
            candle.update(price);
            return None;
        }

        let sealed = self.current.replace(Candle::from_price(bucket, price));
        if let Some(candle) = sealed {
            self.seal(candle);
        }
        sealed
    }

    fn seal(&mut self, candle: Candle) {
        self.history.push_back(candle);
        while self.history.len() > self.limit {
            self.history.pop_front();
        }
    }

    /// Sealed candles, oldest first.
    pub fn history(&self) -> Vec<Candle> {
        self.history.iter().copied().collect()
    }

    pub fn current(&self) -> Option<Candle> {
        self.current
    }

    /// History followed by the open candle.
    pub fn display_candles(&self) -> Vec<Candle> {
        self.history.iter().copied().chain(self.current).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len() + usize::from(self.current.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Chart data for one instrument at every maintained resolution.
#[derive(Debug, Clone)]
pub struct ChartStore {
    one_minute: TimeSeries,
    five_minute: TimeSeries,
    one_hour: TimeSeries,
    /// Newest timestamp covered by the installed backfill.
    backfill_until: Option<i64>,
}

impl ChartStore {
    pub fn new(history_limit: usize) -> Self {
        Self {
            one_minute: TimeSeries::new(ChartResolution::OneMinute, history_limit),
            five_minute: TimeSeries::new(ChartResolution::FiveMinute, history_limit),
            one_hour: TimeSeries::new(ChartResolution::OneHour, history_limit),
            backfill_until: None,
        }
    }

    pub fn series(&self, resolution: ChartResolution) -> &TimeSeries {
        match resolution {
            ChartResolution::OneMinute => &self.one_minute,
            ChartResolution::FiveMinute => &self.five_minute,
            ChartResolution::OneHour => &self.one_hour,
        }
    }

    fn series_mut(&mut self) -> [&mut TimeSeries; 3] {
        [&mut self.one_minute, &mut self.five_minute, &mut self.one_hour]
    }

    /// Replace all resolutions with candles aggregated from a backfill batch.
    /// Returns the number of one-minute candles installed.
    pub fn install_history(&mut self, backfill: &Backfill) -> usize {
        for series in self.series_mut() {
            let width = series.resolution().seconds();
            let candles = match backfill {
                Backfill::Ticks(ticks) => aggregate_ticks(ticks, width),
                Backfill::Ohlc(bars) => aggregate_candles(bars, width),
            };
            series.install(candles);
        }
        self.backfill_until = backfill.latest_time();

        let installed = self.one_minute.len();
        info!(
            "Installed chart history: {} records -> {} 1m / {} 5m / {} 1h candles",
            backfill.len(),
            installed,
            self.five_minute.len(),
            self.one_hour.len()
        );
        installed
    }

    /// Newest timestamp already folded in from the backfill.
    pub fn backfill_until(&self) -> Option<i64> {
        self.backfill_until
    }

    /// Whether a tick is already covered by the backfill or is older than
    /// the open candle at any resolution.
    pub fn is_stale(&self, time: i64) -> bool {
        self.backfill_until.map_or(false, |until| time <= until)
            || ChartResolution::ALL
                .iter()
                .any(|&res| self.series(res).is_stale(time))
    }

    /// Fold a live tick into every resolution.
    ///
    /// Returns `false` (and changes nothing) for invalid prices, for ticks the
    /// backfill already covers and for ticks whose bucket is older than the
    /// open candle.
    pub fn add_tick(&mut self, tick: PriceTick) -> bool {
        if !is_valid_price(tick.price) || self.is_stale(tick.time) {
            return false;
        }

        for series in self.series_mut() {
            if let Some(sealed) = series.add_tick(tick.time, tick.price) {
                debug!(
                    "Sealed {:?} candle at {} (close {:.4})",
                    series.resolution(),
                    sealed.time,
                    sealed.close
                );
            }
        }
        true
    }

    /// Sealed candles for a resolution, oldest first.
    pub fn history(&self, resolution: ChartResolution) -> Vec<Candle> {
        self.series(resolution).history()
    }

    pub fn current(&self, resolution: ChartResolution) -> Option<Candle> {
        self.series(resolution).current()
    }

    /// What the chart shows: sealed history followed by the open candle.
    pub fn display_candles(&self, resolution: ChartResolution) -> Vec<Candle> {
        self.series(resolution).display_candles()
    }
}

impl Default for ChartStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
