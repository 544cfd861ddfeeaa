use serde::{Deserialize, Serialize};

/// Chart resolution for candle aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartResolution {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinute,
    #[serde(rename = "1h")]
    OneHour,
}

impl ChartResolution {
    /// All resolutions maintained by the chart store, finest first.
    pub const ALL: [ChartResolution; 3] = [
        ChartResolution::OneMinute,
        ChartResolution::FiveMinute,
        ChartResolution::OneHour,
    ];

    /// Parse a resolution label.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1m" | "1min" => Some(ChartResolution::OneMinute),
            "5m" | "5min" => Some(ChartResolution::FiveMinute),
            "1h" | "hour" => Some(ChartResolution::OneHour),
            _ => None,
        }
    }

    /// Get the bucket size in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            ChartResolution::OneMinute => 60,
            ChartResolution::FiveMinute => 300,
            ChartResolution::OneHour => 3600,
        }
    }

    /// Start of the bucket containing `timestamp` (epoch seconds).
    pub fn bucket_start(&self, timestamp: i64) -> i64 {
        bucket_start(timestamp, self.seconds())
    }
}

/// `floor(timestamp / width) * width`, correct for pre-epoch timestamps too.
pub fn bucket_start(timestamp: i64, width: i64) -> i64 {
    timestamp.div_euclid(width) * width
}

/// OHLC candle keyed by the start of its bucket (epoch seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

impl Candle {
    /// A candle opened by a single price.
    pub fn from_price(time: i64, price: f64) -> Self {
        Self {
            time,
            open: price,
            high: price,
            low: price,
            close: price,
        }
    }

    /// A candle opened by a finer-grained sub-candle, keeping its extremes.
    pub fn from_sub_candle(time: i64, sub: &Candle) -> Self {
        Self {
            time,
            open: sub.open,
            high: sub.high,
            low: sub.low,
            close: sub.close,
        }
    }

    /// Fold a price tick into this candle.
    pub fn update(&mut self, price: f64) {
        self.high = self.high.max(price);
        self.low = self.low.min(price);
        self.close = price;
    }

    /// Fold a finer-grained sub-candle into this candle.
    pub fn merge(&mut self, sub: &Candle) {
        self.high = self.high.max(sub.high);
        self.low = self.low.min(sub.low);
        self.close = sub.close;
    }

    /// `low <= min(open, close) <= max(open, close) <= high`.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.open.max(self.close) <= self.high
    }
}

/// A bare price observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub time: i64,
    pub price: f64,
}

impl PriceTick {
    pub fn new(time: i64, price: f64) -> Self {
        Self { time, price }
    }
}

/// One parsed line of a tick source: either a bare price or a pre-aggregated candle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickRecord {
    Price(PriceTick),
    Ohlc(Candle),
}

impl TickRecord {
    pub fn time(&self) -> i64 {
        match self {
            TickRecord::Price(t) => t.time,
            TickRecord::Ohlc(c) => c.time,
        }
    }

    /// Closing price of the record.
    pub fn price(&self) -> f64 {
        match self {
            TickRecord::Price(t) => t.price,
            TickRecord::Ohlc(c) => c.close,
        }
    }

    pub fn as_price_tick(&self) -> PriceTick {
        PriceTick::new(self.time(), self.price())
    }

    pub fn as_candle(&self) -> Candle {
        match self {
            TickRecord::Price(t) => Candle::from_price(t.time, t.price),
            TickRecord::Ohlc(c) => *c,
        }
    }
}

/// A one-shot historical batch delivered before the live stream starts.
#[derive(Debug, Clone, PartialEq)]
pub enum Backfill {
    /// Raw `(timestamp, price)` ticks.
    Ticks(Vec<PriceTick>),
    /// Finer-grained OHLC micro-candles (e.g. 5-second bars).
    Ohlc(Vec<Candle>),
}

impl Backfill {
    /// Pick the batch shape from the arity of the first record.
    pub fn from_records(records: &[TickRecord]) -> Self {
        match records.first() {
            Some(TickRecord::Ohlc(_)) => {
                Backfill::Ohlc(records.iter().map(TickRecord::as_candle).collect())
            }
            _ => Backfill::Ticks(records.iter().map(TickRecord::as_price_tick).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Backfill::Ticks(t) => t.len(),
            Backfill::Ohlc(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Newest timestamp in the batch, regardless of arrival order.
    pub fn latest_time(&self) -> Option<i64> {
        match self {
            Backfill::Ticks(t) => t.iter().map(|tick| tick.time).max(),
            Backfill::Ohlc(c) => c.iter().map(|candle| candle.time).max(),
        }
    }
}

impl Default for Backfill {
    fn default() -> Self {
        Backfill::Ticks(Vec::new())
    }
}
