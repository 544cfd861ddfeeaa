//! Delivery of emitted signals to the order/notification side.

use super::strategy::apply_broker_commission;
use crate::error::Result;
use crate::types::{Signal, SignalEvent};
use std::io::Write;

impl SignalEvent {
    /// Event for a surfaced signal at `price`, stamped with the current time.
    pub fn new(signal: Signal, price: f64, commission_rate: f64) -> Self {
        Self {
            signal,
            price,
            net_price: apply_broker_commission(price, signal, commission_rate),
            commission_rate,
            instrument: None,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.instrument = Some(instrument.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp = timestamp_ms;
        self
    }

    /// Stamp with a tick time given in epoch seconds.
    pub fn with_tick_time(self, seconds: i64) -> Self {
        self.with_timestamp(seconds.saturating_mul(1000))
    }
}

/// Receiver of emitted signals.
pub trait SignalSink {
    fn deliver(&mut self, event: &SignalEvent) -> Result<()>;
}

/// Collects events in memory.
impl SignalSink for Vec<SignalEvent> {
    fn deliver(&mut self, event: &SignalEvent) -> Result<()> {
        self.push(event.clone());
        Ok(())
    }
}

/// Writes one JSON object per event, newline-terminated.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> SignalSink for JsonLinesSink<W> {
    fn deliver(&mut self, event: &SignalEvent) -> Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
