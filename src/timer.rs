use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Time source for the session timer
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Clone, Debug)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Tracks whole seconds since the current session started
#[derive(Debug, Clone)]
pub struct Timer<C: Clock> {
    clock: C,
    started_at: Option<Instant>,
    stopped_at: Option<Instant>,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            started_at: None,
            stopped_at: None,
        }
    }

    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now());
        self.stopped_at = None;
    }

    /// Stop counting; elapsed stays at the value it had when stopped
    pub fn stop(&mut self) {
        if self.is_running() {
            self.stopped_at = Some(self.clock.now());
        }
    }

    pub fn reset(&mut self) {
        self.started_at = None;
        self.stopped_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.stopped_at.is_none()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        match self.started_at {
            Some(start) => {
                let end = self.stopped_at.unwrap_or_else(|| self.clock.now());
                end.saturating_duration_since(start).as_secs()
            }
            None => 0,
        }
    }
}
