use std::time::Duration;
use tracing::trace;

use crate::domain::{AppConfig, AppError, Message};
use crate::model::{Model, Modus};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyModifiers};

pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &AppConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, AppError> {
        if event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(self.map_event(model, event::read()?));
        }
        Ok(None)
    }

    pub fn map_event(&self, model: &Model, event: Event) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                if model.raw_keyevents() {
                    Some(Message::RawKey(key))
                } else {
                    self.handle_key(model.modus(), key)
                }
            }
            Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
            _ => None,
        }
    }

    fn handle_key(&self, modus: Modus, key: event::KeyEvent) -> Option<Message> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Message::Quit),
                KeyCode::Char('s') => Some(Message::Save),
                _ => None,
            };
        }

        let message = match (modus, key.code) {
            (_, KeyCode::Char('q')) => Some(Message::Quit),
            (_, KeyCode::Char('?')) => Some(Message::Help),
            (_, KeyCode::Esc) => Some(Message::Exit),
            (_, KeyCode::Enter) => Some(Message::Enter),
            (_, KeyCode::Char('w')) => Some(Message::Save),
            (_, KeyCode::Char('W')) => Some(Message::SaveAs),
            (_, KeyCode::Char('o')) => Some(Message::Open),
            (_, KeyCode::Char('p')) => Some(Message::ToggleChart),
            (Modus::CHART, KeyCode::Char('x')) => Some(Message::NextXAxis),
            (Modus::CHART, KeyCode::Char('X')) => Some(Message::PrevXAxis),
            (Modus::CHART, KeyCode::Char('y')) => Some(Message::NextYAxis),
            (Modus::CHART, KeyCode::Char('Y')) => Some(Message::PrevYAxis),
            (_, KeyCode::Down | KeyCode::Char('j')) => Some(Message::MoveDown),
            (_, KeyCode::Up | KeyCode::Char('k')) => Some(Message::MoveUp),
            (_, KeyCode::Left | KeyCode::Char('h')) => Some(Message::MoveLeft),
            (_, KeyCode::Right | KeyCode::Char('l')) => Some(Message::MoveRight),
            (_, KeyCode::PageUp) => Some(Message::MovePageUp),
            (_, KeyCode::PageDown) => Some(Message::MovePageDown),
            (_, KeyCode::Home | KeyCode::Char('g')) => Some(Message::MoveBeginning),
            (_, KeyCode::End | KeyCode::Char('G')) => Some(Message::MoveEnd),
            (_, KeyCode::Char('^')) => Some(Message::MoveToFirstColumn),
            (_, KeyCode::Char('$')) => Some(Message::MoveToLastColumn),
            (_, KeyCode::Char('e')) => Some(Message::EditCell),
            (_, KeyCode::Char('a')) => Some(Message::AddRow),
            (_, KeyCode::Char('d')) => Some(Message::DeleteRow),
            (_, KeyCode::Char('c')) => Some(Message::CopyCell),
            (_, KeyCode::Char('C')) => Some(Message::CopyRow),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}
