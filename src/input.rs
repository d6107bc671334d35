use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Turn(Direction),
    Reset,
    Pause,
    Quit,
}

impl InputEvent {
    pub fn from_key_event(ev: &KeyEvent) -> Option<InputEvent> {
        if is_ctrl_c(ev) {
            return Some(InputEvent::Quit);
        }

        let event = match ev.code {
            KeyCode::Char('w' | 'W') | KeyCode::Up => InputEvent::Turn(Direction::Up),
            KeyCode::Char('a' | 'A') | KeyCode::Left => InputEvent::Turn(Direction::Left),
            KeyCode::Char('s' | 'S') | KeyCode::Down => InputEvent::Turn(Direction::Down),
            KeyCode::Char('d' | 'D') | KeyCode::Right => InputEvent::Turn(Direction::Right),
            KeyCode::Esc => InputEvent::Reset,
            KeyCode::Char(' ' | 'p' | 'P') => InputEvent::Pause,
            KeyCode::Char('q' | 'Q') => InputEvent::Quit,
            _ => return None,
        };
        Some(event)
    }
}

pub fn is_ctrl_c(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
}
