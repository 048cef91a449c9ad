use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

use crate::controller::{Event, Phase};
use crate::session::Keystroke;

/// What a terminal event means to the app
#[derive(Debug)]
pub enum Action {
    Game(Event),
    Quit,
}

pub fn map_key(key: KeyEvent, phase: Phase) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match (phase, key.code) {
        (Phase::Idle, KeyCode::Esc) => Some(Action::Quit),
        (Phase::Idle, KeyCode::Enter) => Some(Action::Game(Event::Activate)),
        (Phase::Idle, _) => None,
        (Phase::Typing, KeyCode::Esc) => Some(Action::Game(Event::Deactivate)),
        (Phase::Typing, KeyCode::Backspace) => {
            Some(Action::Game(Event::KeyDown(Keystroke::DeleteLast)))
        }
        (Phase::Typing, KeyCode::Char(c)) => Some(Action::Game(Event::KeyDown(Keystroke::Char(c)))),
        (Phase::Typing, _) => Some(Action::Game(Event::KeyDown(Keystroke::Other))),
    }
}

/// Left clicks inside the quote box activate, clicks anywhere else reset
pub fn map_mouse(mouse: MouseEvent, quote_area: Rect) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let inside = quote_area.contains(Position::new(mouse.column, mouse.row));
            Some(Action::Game(if inside {
                Event::Activate
            } else {
                Event::Deactivate
            }))
        }
        _ => None,
    }
}
