use crate::quote::{FetchError, Quote};
use crate::session::{Keystroke, Session, StrokeResult};
use crate::timer::{Clock, SystemClock, Timer};
use crate::wpm::compute_wpm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Typing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the game reacts to, already translated from the terminal
#[derive(Debug)]
pub enum Event {
    KeyDown(Keystroke),
    Activate,
    Deactivate,
    TimerTick,
    FetchCompleted(Result<Quote, FetchError>),
}

/// Work the host has to carry out after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    FetchQuote,
    Redraw,
}

/// Owns the session and its timer and drives them from discrete events.
/// All events must come from one thread, in order.
#[derive(Debug)]
pub struct Controller<C: Clock = SystemClock> {
    phase: Phase,
    status: QuoteStatus,
    session: Session,
    timer: Timer<C>,
    elapsed_secs: u64,
    wpm: u32,
}

impl Controller<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Controller<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Controller<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            phase: Phase::Idle,
            status: QuoteStatus::Loading,
            session: Session::new(),
            timer: Timer::new(clock),
            elapsed_secs: 0,
            wpm: 0,
        }
    }

    /// Commands to run before the first event: load the first quote
    pub fn initial_commands(&self) -> Vec<Command> {
        match self.status {
            QuoteStatus::Loading => vec![Command::FetchQuote],
            _ => vec![],
        }
    }

    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        match event {
            Event::Activate => self.on_activate(),
            Event::Deactivate => self.on_deactivate(),
            Event::KeyDown(keystroke) => self.on_key(keystroke),
            Event::TimerTick => self.on_tick(),
            Event::FetchCompleted(result) => self.on_fetch_completed(result),
        }
    }

    fn on_activate(&mut self) -> Vec<Command> {
        if self.phase == Phase::Typing {
            return vec![];
        }
        match self.status {
            QuoteStatus::Ready => {
                if !self.session.begin() {
                    return vec![];
                }
                self.timer.start();
                self.elapsed_secs = 0;
                self.set_phase(Phase::Typing);
                tracing::info!(
                    chars = self.session.quote().map_or(0, Quote::len),
                    "session started"
                );
                vec![Command::Redraw]
            }
            QuoteStatus::Failed(_) => {
                tracing::info!("retrying quote fetch");
                self.status = QuoteStatus::Loading;
                vec![Command::FetchQuote, Command::Redraw]
            }
            QuoteStatus::Loading => vec![],
        }
    }

    fn on_deactivate(&mut self) -> Vec<Command> {
        if self.phase == Phase::Typing {
            tracing::info!(index = self.session.index(), "session reset");
        }
        self.stop_session();
        vec![Command::Redraw]
    }

    fn on_key(&mut self, keystroke: Keystroke) -> Vec<Command> {
        if self.phase != Phase::Typing || self.status != QuoteStatus::Ready {
            return vec![];
        }

        match self.session.record(keystroke) {
            StrokeResult::Ignored => vec![],
            StrokeResult::Complete => {
                self.refresh_readouts();
                self.timer.stop();
                self.status = QuoteStatus::Loading;
                tracing::info!(
                    elapsed_secs = self.elapsed_secs,
                    wpm = self.wpm,
                    correct = self.session.correct_count(),
                    "quote completed"
                );
                vec![Command::Redraw, Command::FetchQuote]
            }
            StrokeResult::Advanced | StrokeResult::Retreated => {
                self.refresh_readouts();
                vec![Command::Redraw]
            }
        }
    }

    fn on_tick(&mut self) -> Vec<Command> {
        if !self.timer.is_running() {
            return vec![];
        }
        self.refresh_readouts();
        vec![Command::Redraw]
    }

    fn on_fetch_completed(&mut self, result: Result<Quote, FetchError>) -> Vec<Command> {
        match result {
            Ok(quote) => {
                tracing::info!(chars = quote.len(), phase = %self.phase, "quote loaded");
                match self.phase {
                    Phase::Typing => {
                        self.session.start(quote);
                        self.timer.start();
                        self.elapsed_secs = 0;
                    }
                    // arrived at start-up, after a retry, or after a reset mid-fetch
                    Phase::Idle => self.session.load(quote),
                }
                self.status = QuoteStatus::Ready;
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load quote");
                self.status = QuoteStatus::Failed(err.to_string());
                self.stop_session();
            }
        }
        vec![Command::Redraw]
    }

    fn stop_session(&mut self) {
        self.session.reset();
        self.timer.stop();
        self.timer.reset();
        self.elapsed_secs = 0;
        self.set_phase(Phase::Idle);
    }

    fn refresh_readouts(&mut self) {
        if !self.session.is_started() {
            return;
        }
        self.elapsed_secs = self.timer.elapsed_seconds();
        self.wpm = compute_wpm(self.session.correct_count(), self.elapsed_secs);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            tracing::debug!(from = %self.phase, to = %phase, "phase change");
            self.phase = phase;
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &QuoteStatus {
        &self.status
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_typing(&self) -> bool {
        self.phase == Phase::Typing
    }

    pub fn timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Elapsed seconds as last shown
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_secs
    }

    /// WPM as last shown. Survives a reset.
    pub fn wpm(&self) -> u32 {
        self.wpm
    }
}
