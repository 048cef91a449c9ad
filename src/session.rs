use crate::quote::Quote;

/// Per-character record of how the player did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mark {
    #[default]
    Untested,
    Correct,
    Incorrect,
}

/// A single key press as seen by the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keystroke {
    Char(char),
    DeleteLast,
    /// Any non-character key (Enter, Tab, ...). Never matches the expected char.
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeResult {
    Ignored,
    Advanced,
    Retreated,
    Complete,
}

/// One attempt at typing a single quote
#[derive(Debug, Clone, Default)]
pub struct Session {
    quote: Option<Quote>,
    index: usize,
    marks: Vec<Mark>,
    correct_strokes: usize,
    started: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `quote` and start typing it
    pub fn start(&mut self, quote: Quote) {
        self.load(quote);
        self.started = true;
    }

    /// Load `quote` without starting
    pub fn load(&mut self, quote: Quote) {
        self.marks = vec![Mark::Untested; quote.len()];
        self.quote = Some(quote);
        self.index = 0;
        self.correct_strokes = 0;
        self.started = false;
    }

    /// Start typing the quote that is already loaded. Returns false if there is none.
    pub fn begin(&mut self) -> bool {
        if self.quote.is_none() {
            return false;
        }
        self.started = true;
        true
    }

    pub fn record(&mut self, keystroke: Keystroke) -> StrokeResult {
        if !self.started || self.is_complete() {
            return StrokeResult::Ignored;
        }
        let Some(expected) = self.quote.as_ref().and_then(|q| q.char_at(self.index)) else {
            return StrokeResult::Ignored;
        };

        let hit = match keystroke {
            Keystroke::DeleteLast => {
                self.index = self.index.saturating_sub(1);
                return StrokeResult::Retreated;
            }
            Keystroke::Char(c) => c == expected,
            Keystroke::Other => false,
        };

        let mark = &mut self.marks[self.index];
        if hit {
            // a position missed once stays missed
            if *mark != Mark::Incorrect {
                *mark = Mark::Correct;
            }
            self.correct_strokes += 1;
        } else {
            *mark = Mark::Incorrect;
        }
        self.index += 1;

        if self.is_complete() {
            StrokeResult::Complete
        } else {
            StrokeResult::Advanced
        }
    }

    /// Clear progress but keep the quote on screen
    pub fn reset(&mut self) {
        self.index = 0;
        self.marks.iter_mut().for_each(|m| *m = Mark::Untested);
        self.correct_strokes = 0;
        self.started = false;
    }

    pub fn quote(&self) -> Option<&Quote> {
        self.quote.as_ref()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Correct strokes since the session started. Retyping a deleted
    /// character correctly counts again.
    pub fn correct_count(&self) -> usize {
        self.correct_strokes
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_complete(&self) -> bool {
        self.quote
            .as_ref()
            .is_some_and(|q| self.index == q.len())
    }
}
