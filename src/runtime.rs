use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

use crate::quote::{FetchError, Quote, QuoteProvider};

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app loop
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
    QuoteFetched(Result<Quote, FetchError>),
}

/// Source of app events (keyboard, mouse, fetch results, ...)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(CtEvent::Key(key)) => reader_tx.send(AppEvent::Key(key)),
                Ok(CtEvent::Mouse(mouse)) => reader_tx.send(AppEvent::Mouse(mouse)),
                Ok(CtEvent::Resize(_, _)) => reader_tx.send(AppEvent::Resize),
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!(error = %err, "terminal event reader stopped");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Sender feeding the same queue as terminal input
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Serializes events and fixed-rate ticks into one stream
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Blocks until the next event or tick deadline, whichever comes first.
    /// Ticks keep their cadence regardless of how many events arrive.
    pub fn step(&mut self) -> AppEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            self.schedule_next_tick(now);
            return AppEvent::Tick;
        }

        let remaining = self.next_tick - now;
        match self.event_source.recv_timeout(remaining) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.schedule_next_tick(Instant::now());
                AppEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(remaining);
                self.schedule_next_tick(Instant::now());
                AppEvent::Tick
            }
        }
    }

    fn schedule_next_tick(&mut self, now: Instant) {
        self.next_tick += self.ticker.interval();
        // fell behind by more than one interval: skip, don't burst
        if self.next_tick <= now {
            self.next_tick = now + self.ticker.interval();
        }
    }
}

/// Runs quote fetches off the app loop and posts the result back as an event.
/// A fetch in flight cannot be cancelled.
#[derive(Clone)]
pub struct QuoteFetcher {
    provider: Arc<dyn QuoteProvider>,
    tx: Sender<AppEvent>,
}

impl QuoteFetcher {
    pub fn new(provider: Arc<dyn QuoteProvider>, tx: Sender<AppEvent>) -> Self {
        Self { provider, tx }
    }

    pub fn request(&self) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        tracing::debug!("quote fetch requested");

        std::thread::spawn(move || {
            let result = provider.fetch_quote();
            if tx.send(AppEvent::QuoteFetched(result)).is_err() {
                tracing::debug!("app loop gone before quote arrived");
            }
        });
    }
}
