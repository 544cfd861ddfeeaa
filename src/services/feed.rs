//! Live chart feed gated on a one-shot historical backfill.
//!
//! Live ticks that arrive before the backfill lands are queued and replayed
//! once history is installed, so buckets are never folded out of order.

use super::chart_store::ChartStore;
use crate::error::{EngineError, Result};
use crate::types::{Backfill, Candle, PriceTick, TickRecord};
use std::io::BufRead;
use tracing::{debug, info, warn};

/// Gate state of the live feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    AwaitingBackfill,
    Live,
}

/// What happened to a live tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Held until the backfill completes.
    Queued,
    /// Folded into the chart.
    Folded,
    /// Rejected: invalid price or older than the open candle.
    Dropped,
}

/// Chart store behind a backfill gate.
#[derive(Debug)]
pub struct LiveFeed {
    store: ChartStore,
    state: FeedState,
    pending: Vec<PriceTick>,
}

impl LiveFeed {
    pub fn new(store: ChartStore) -> Self {
        Self {
            store,
            state: FeedState::AwaitingBackfill,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> FeedState {
        self.state
    }

    pub fn is_live(&self) -> bool {
        self.state == FeedState::Live
    }

    pub fn store(&self) -> &ChartStore {
        &self.store
    }

    /// Live ticks waiting for the backfill.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Accept a live tick: queue it before the backfill, fold it after.
    pub fn push_live(&mut self, tick: PriceTick) -> TickOutcome {
        match self.state {
            FeedState::AwaitingBackfill => {
                self.pending.push(tick);
                TickOutcome::Queued
            }
            FeedState::Live => self.fold(tick),
        }
    }

    fn fold(&mut self, tick: PriceTick) -> TickOutcome {
        if self.store.add_tick(tick) {
            TickOutcome::Folded
        } else {
            warn!("Dropping live tick at {} (price {})", tick.time, tick.price);
            TickOutcome::Dropped
        }
    }

    /// Install history, open the gate and replay queued live ticks.
    ///
    /// Returns the queued ticks that were folded, in arrival order, so the
    /// caller can hand them on to a strategy. A second call is ignored.
    pub fn complete_backfill(&mut self, backfill: Backfill) -> Vec<PriceTick> {
        if self.is_live() {
            warn!("Backfill already completed; ignoring {} records", backfill.len());
            return Vec::new();
        }

        self.store.install_history(&backfill);
        self.state = FeedState::Live;

        let pending = std::mem::take(&mut self.pending);
        let queued = pending.len();
        let replayed: Vec<PriceTick> = pending
            .into_iter()
            .filter(|&tick| self.fold(tick) == TickOutcome::Folded)
            .collect();

        info!(
            "Feed live: replayed {} of {} queued ticks",
            replayed.len(),
            queued
        );
        replayed
    }
}

fn parse_field<T: std::str::FromStr>(field: &str, name: &str, line: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| EngineError::InvalidInput(format!("bad {} in tick line '{}'", name, line)))
}

fn positive(value: f64, name: &str, line: &str) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(EngineError::InvalidInput(format!(
            "non-positive {} in tick line '{}'",
            name, line
        )))
    }
}

/// Parse `ts,price` or `ts,open,high,low,close`.
pub fn parse_tick_line(line: &str) -> Result<TickRecord> {
    let fields: Vec<&str> = line.trim().split(',').collect();
    match fields.as_slice() {
        [ts, price] => {
            let time = parse_field(ts, "timestamp", line)?;
            let price = positive(parse_field(price, "price", line)?, "price", line)?;
            Ok(TickRecord::Price(PriceTick::new(time, price)))
        }
        [ts, open, high, low, close] => {
            let candle = Candle {
                time: parse_field(ts, "timestamp", line)?,
                open: positive(parse_field(open, "open", line)?, "open", line)?,
                high: positive(parse_field(high, "high", line)?, "high", line)?,
                low: positive(parse_field(low, "low", line)?, "low", line)?,
                close: positive(parse_field(close, "close", line)?, "close", line)?,
            };
            if !candle.is_consistent() {
                return Err(EngineError::InvalidInput(format!(
                    "inconsistent OHLC in tick line '{}'",
                    line
                )));
            }
            Ok(TickRecord::Ohlc(candle))
        }
        _ => Err(EngineError::InvalidInput(format!(
            "expected 2 or 5 columns, got {} in '{}'",
            fields.len(),
            line
        ))),
    }
}

/// Whether a line carries no tick (blank or `#` comment).
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Read every tick record from a source, skipping blank, comment and malformed lines.
pub fn read_tick_records<R: BufRead>(reader: R) -> Result<Vec<TickRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if is_skippable(&line) {
            continue;
        }
        match parse_tick_line(&line) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping line {}: {}", index + 1, e),
        }
    }
    debug!("Read {} tick records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChartResolution;

    #[test]
    fn test_parse_price_line() {
        assert_eq!(
            parse_tick_line("1700000000, 101.5").unwrap(),
            TickRecord::Price(PriceTick::new(1_700_000_000, 101.5))
        );
    }

    #[test]
    fn test_parse_ohlc_line() {
        let record = parse_tick_line("60,10,12,9,11").unwrap();
        assert_eq!(
            record,
            TickRecord::Ohlc(Candle {
                time: 60,
                open: 10.0,
                high: 12.0,
                low: 9.0,
                close: 11.0
            })
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        for line in ["", "abc,1", "1,2,3", "1,-5", "1,0", "1,10,9,8,9.5", "1,NaN"] {
            assert!(
                matches!(parse_tick_line(line), Err(EngineError::InvalidInput(_))),
                "accepted {:?}",
                line
            );
        }
    }

    #[test]
    fn test_read_tick_records_skips_noise() {
        let input = "# ts,price\n0,10\n\nbogus\n60,11\n";
        let records = read_tick_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].price(), 11.0);
    }

    #[test]
    fn test_ticks_queue_until_backfill() {
        let mut feed = LiveFeed::new(ChartStore::default());
        assert_eq!(feed.push_live(PriceTick::new(130, 12.0)), TickOutcome::Queued);
        assert_eq!(feed.pending_len(), 1);
        assert!(feed
            .store()
            .display_candles(ChartResolution::OneMinute)
            .is_empty());

        let backfill = Backfill::Ticks(vec![PriceTick::new(0, 10.0), PriceTick::new(70, 11.0)]);
        let replayed = feed.complete_backfill(backfill);
        assert_eq!(replayed, vec![PriceTick::new(130, 12.0)]);
        assert!(feed.is_live());

        let candles = feed.store().display_candles(ChartResolution::OneMinute);
        assert_eq!(candles.iter().map(|c| c.time).collect::<Vec<_>>(), vec![0, 60, 120]);
    }

    #[test]
    fn test_stale_queued_tick_is_dropped_on_replay() {
        let mut feed = LiveFeed::new(ChartStore::default());
        feed.push_live(PriceTick::new(10, 9.0));
        let replayed = feed.complete_backfill(Backfill::Ticks(vec![PriceTick::new(200, 10.0)]));
        assert!(replayed.is_empty());
    }

    #[test]
    fn test_tick_covered_by_backfill_is_not_replayed() {
        let mut feed = LiveFeed::new(ChartStore::default());
        feed.push_live(PriceTick::new(140, 10.0));
        let replayed = feed.complete_backfill(Backfill::Ticks(vec![
            PriceTick::new(120, 15.0),
            PriceTick::new(140, 10.0),
            PriceTick::new(150, 20.0),
        ]));
        assert!(replayed.is_empty());
        assert_eq!(feed.push_live(PriceTick::new(150, 18.0)), TickOutcome::Dropped);
        assert_eq!(feed.push_live(PriceTick::new(151, 18.0)), TickOutcome::Folded);
    }

    #[test]
    fn test_empty_backfill_opens_gate() {
        let mut feed = LiveFeed::new(ChartStore::default());
        feed.complete_backfill(Backfill::default());
        assert_eq!(feed.push_live(PriceTick::new(0, 1.0)), TickOutcome::Folded);
    }

    #[test]
    fn test_live_tick_in_backfill_bucket_extends_it() {
        let mut feed = LiveFeed::new(ChartStore::default());
        feed.complete_backfill(Backfill::Ticks(vec![PriceTick::new(60, 10.0)]));
        assert_eq!(feed.push_live(PriceTick::new(90, 13.0)), TickOutcome::Folded);

        let candles = feed.store().display_candles(ChartResolution::OneMinute);
        assert_eq!(candles.len(), 1);
        assert_eq!(candles[0].high, 13.0);
        assert_eq!(candles[0].open, 10.0);
    }
}
