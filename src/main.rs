use adaptive_signals::config::Config;
use adaptive_signals::services::instruments::is_instrument_uid;
use adaptive_signals::services::{
    build_strategy, is_skippable, parse_tick_line, read_tick_records, warm_up, ChartStore,
    InstrumentCache, InstrumentDirectory, JsonLinesSink, LiveFeed, SignalSink, Strategy,
    TickOutcome,
};
use adaptive_signals::types::{
    Backfill, ChartResolution, PriceTick, SignalEvent, SignalStats, TickRecord,
};
use std::io::Stdout;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Live ticks buffered between the reader task and the engine loop.
const TICK_CHANNEL_CAPACITY: usize = 1024;

type BackfillResult = anyhow::Result<Backfill>;

/// Engine state driven by the main loop.
struct Session {
    feed: LiveFeed,
    strategy: Box<dyn Strategy>,
    stats: SignalStats,
    sink: JsonLinesSink<Stdout>,
    commission: f64,
    instrument: Option<String>,
}

impl Session {
    /// Install history, warm the strategy on every backfilled minute (the open
    /// one included) and run any ticks queued meanwhile.
    fn on_backfill(
        &mut self,
        batch: Result<BackfillResult, oneshot::error::RecvError>,
    ) -> anyhow::Result<()> {
        let backfill = match batch {
            Ok(Ok(backfill)) => backfill,
            Ok(Err(e)) => {
                warn!("Backfill failed, starting without history: {}", e);
                Backfill::default()
            }
            Err(_) => {
                warn!("Backfill task ended without reporting; starting without history");
                Backfill::default()
            }
        };

        let replayed = self.feed.complete_backfill(backfill);
        let candles = self.feed.store().display_candles(ChartResolution::OneMinute);
        warm_up(self.strategy.as_mut(), &candles);

        for tick in replayed {
            self.analyze(tick)?;
        }
        Ok(())
    }

    fn on_tick(&mut self, tick: PriceTick) -> anyhow::Result<()> {
        match self.feed.push_live(tick) {
            TickOutcome::Folded => self.analyze(tick),
            TickOutcome::Queued => {
                debug!("Queued tick at {} until backfill completes", tick.time);
                Ok(())
            }
            TickOutcome::Dropped => Ok(()),
        }
    }

    fn analyze(&mut self, tick: PriceTick) -> anyhow::Result<()> {
        let Some(signal) = self.strategy.analyze(tick.price) else {
            return Ok(());
        };
        self.stats.record(signal);

        let mut event =
            SignalEvent::new(signal, tick.price, self.commission).with_tick_time(tick.time);
        if let Some(instrument) = &self.instrument {
            event = event.with_instrument(instrument.clone());
        }
        self.sink.deliver(&event)?;
        Ok(())
    }
}

async fn load_backfill(path: PathBuf) -> BackfillResult {
    info!("Loading backfill from {}", path.display());
    let records = tokio::task::spawn_blocking(
        move || -> adaptive_signals::Result<Vec<TickRecord>> {
            let file = std::fs::File::open(&path)?;
            read_tick_records(std::io::BufReader::new(file))
        },
    )
    .await??;
    Ok(Backfill::from_records(&records))
}

/// Forward parsed live ticks until the source ends or the engine stops listening.
async fn forward_ticks<R>(reader: R, tx: mpsc::Sender<PriceTick>) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut sent = 0;
    while let Some(line) = lines.next_line().await? {
        if is_skippable(&line) {
            continue;
        }
        match parse_tick_line(&line) {
            Ok(record) => {
                if tx.send(record.as_price_tick()).await.is_err() {
                    break;
                }
                sent += 1;
            }
            Err(e) => warn!("Skipping live line: {}", e),
        }
    }
    Ok(sent)
}

async fn read_live_ticks(path: Option<PathBuf>, tx: mpsc::Sender<PriceTick>) {
    let result = match path {
        Some(path) => match tokio::fs::File::open(&path).await {
            Ok(file) => forward_ticks(BufReader::new(file), tx).await,
            Err(e) => Err(e.into()),
        },
        None => forward_ticks(BufReader::new(tokio::io::stdin()), tx).await,
    };

    match result {
        Ok(sent) => info!("Live tick source finished after {} ticks", sent),
        Err(e) => warn!("Live tick source failed: {}", e),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "adaptive_signals=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting {} (commission {:.4}%)",
        config.strategy.kind.display_name(),
        config.strategy.cost.commission * 100.0
    );

    let directory = InstrumentCache::new();
    let instrument = config.instrument.as_ref().map(|id| {
        if let Some(name) = &config.instrument_name {
            let ticker = (!is_instrument_uid(id)).then_some(id.as_str());
            directory.remember(id, name, ticker);
        }
        directory.label(id)
    });

    // Backfill runs once and reports completion; live folding waits on it.
    let (backfill_tx, mut backfill_rx) = oneshot::channel::<BackfillResult>();
    let backfill_path = config.backfill_path.clone();
    tokio::spawn(async move {
        let batch = match backfill_path {
            Some(path) => load_backfill(path).await,
            None => Ok(Backfill::default()),
        };
        let _ = backfill_tx.send(batch);
    });

    let (tick_tx, mut tick_rx) = mpsc::channel(TICK_CHANNEL_CAPACITY);
    tokio::spawn(read_live_ticks(config.ticks_path.clone(), tick_tx));

    let mut session = Session {
        feed: LiveFeed::new(ChartStore::new(config.candle_history_limit)),
        strategy: build_strategy(&config.strategy),
        stats: SignalStats::default(),
        sink: JsonLinesSink::new(std::io::stdout()),
        commission: config.strategy.cost.commission,
        instrument,
    };

    loop {
        tokio::select! {
            batch = &mut backfill_rx, if !session.feed.is_live() => {
                session.on_backfill(batch)?;
            }
            tick = tick_rx.recv() => {
                match tick {
                    Some(tick) => session.on_tick(tick)?,
                    None => {
                        if !session.feed.is_live() {
                            let batch = (&mut backfill_rx).await;
                            session.on_backfill(batch)?;
                        }
                        break;
                    }
                }
            }
        }
    }

    info!(
        "Session finished: {} signals ({} BUY / {} SELL)",
        session.stats.total, session.stats.buy, session.stats.sell
    );
    info!(
        "Final indicators: {}",
        serde_json::to_string(&session.strategy.summary())?
    );
    Ok(())
}
