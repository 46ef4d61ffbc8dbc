use std::time::Duration;

use ratatui::crossterm::event::{self, Event, KeyCode};
use tracing::trace;

use crate::domain::{Message, RosterConfig, RosterError};
use crate::model::Model;

pub struct Controller {
    event_poll_ms: u64,
}

impl Controller {
    pub fn new(cfg: &RosterConfig) -> Self {
        Self {
            event_poll_ms: cfg.event_poll_ms,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, RosterError> {
        if event::poll(Duration::from_millis(self.event_poll_ms))?
            && let Event::Key(key) = event::read()?
            && key.kind == event::KeyEventKind::Press
        {
            // The open filter box consumes keys verbatim.
            if model.raw_keyevents() {
                return Ok(Some(Message::RawKey(key)));
            }
            return Ok(self.handle_key(key));
        }
        Ok(None)
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Left | KeyCode::Char('h') => Some(Message::MoveLeft),
            KeyCode::Right | KeyCode::Char('l') => Some(Message::MoveRight),
            KeyCode::PageDown | KeyCode::Char('n') => Some(Message::NextPage),
            KeyCode::PageUp | KeyCode::Char('p') => Some(Message::PrevPage),
            KeyCode::Home => Some(Message::FirstPage),
            KeyCode::End => Some(Message::LastPage),
            KeyCode::Char('s') => Some(Message::SortAscending),
            KeyCode::Char('S') => Some(Message::SortDescending),
            KeyCode::Char('/') => Some(Message::EnterFilter),
            KeyCode::Char('c') => Some(Message::ToggleColumns),
            KeyCode::Char('x') => Some(Message::Export),
            KeyCode::Char('?') => Some(Message::Help),
            KeyCode::Enter => Some(Message::Select),
            KeyCode::Esc => Some(Message::Exit),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
