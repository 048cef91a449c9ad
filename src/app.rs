use ratatui::layout::Rect;

use crate::controller::{Command, Controller, Event};
use crate::input::{self, Action};
use crate::runtime::{AppEvent, QuoteFetcher};
use crate::timer::{Clock, SystemClock};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue { redraw: bool },
    Quit,
}

/// Glue between the event stream, the controller and the quote fetcher
pub struct App<C: Clock = SystemClock> {
    controller: Controller<C>,
    fetcher: QuoteFetcher,
}

impl App<SystemClock> {
    pub fn new(fetcher: QuoteFetcher) -> Self {
        Self::with_controller(Controller::new(), fetcher)
    }
}

impl<C: Clock> App<C> {
    pub fn with_controller(controller: Controller<C>, fetcher: QuoteFetcher) -> Self {
        Self {
            controller,
            fetcher,
        }
    }

    /// Kick off the first quote fetch
    pub fn start(&mut self) {
        let commands = self.controller.initial_commands();
        self.execute(commands);
    }

    /// Handle one event. `screen` is the full terminal area, used for mouse hit testing.
    pub fn on_event(&mut self, event: AppEvent, screen: Rect) -> Flow {
        let action = match event {
            AppEvent::Tick => Some(Action::Game(Event::TimerTick)),
            AppEvent::Resize => return Flow::Continue { redraw: true },
            AppEvent::Key(key) => input::map_key(key, self.controller.phase()),
            AppEvent::Mouse(mouse) => {
                input::map_mouse(mouse, ui::quote_area(&self.controller, screen))
            }
            AppEvent::QuoteFetched(result) => Some(Action::Game(Event::FetchCompleted(result))),
        };

        match action {
            Some(Action::Quit) => Flow::Quit,
            Some(Action::Game(event)) => {
                let commands = self.controller.handle(event);
                Flow::Continue {
                    redraw: self.execute(commands),
                }
            }
            None => Flow::Continue { redraw: false },
        }
    }

    fn execute(&mut self, commands: Vec<Command>) -> bool {
        let mut redraw = false;
        for command in commands {
            match command {
                Command::FetchQuote => self.fetcher.request(),
                Command::Redraw => redraw = true,
            }
        }
        redraw
    }

    pub fn controller(&self) -> &Controller<C> {
        &self.controller
    }
}
