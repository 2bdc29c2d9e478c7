//! Terminal event polling.
//!
//! Raw crossterm events are narrowed to the few the viewer cares about.
//! Key presses are passed through untouched: their meaning depends on the
//! mode (text entry on the sign-in screen, bindings on the report).

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, MouseEventKind};
use thiserror::Error;

/// Rows scrolled per mouse-wheel notch.
pub const WHEEL_ROWS: i64 = 3;

/// Error type for event polling.
#[derive(Debug, Error)]
pub enum EventError {
    /// Reading from the terminal failed.
    #[error("failed to read terminal event: {0}")]
    Io(#[from] std::io::Error),
}

/// A terminal event relevant to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A key event.
    Key(KeyEvent),
    /// Mouse wheel, in rows (negative is up).
    Scroll(i64),
    /// The terminal was resized.
    Resize(u16, u16),
}

/// Narrow a crossterm event. Everything else is dropped.
#[must_use]
pub fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(AppEvent::Scroll(-WHEEL_ROWS)),
            MouseEventKind::ScrollDown => Some(AppEvent::Scroll(WHEEL_ROWS)),
            _ => None,
        },
        Event::Resize(width, height) => Some(AppEvent::Resize(width, height)),
        _ => None,
    }
}

/// Polls crossterm for input.
#[derive(Debug, Default, Clone, Copy)]
pub struct EventHandler;

impl EventHandler {
    /// Create an event handler.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Wait up to `timeout` for the next relevant event.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read.
    pub fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>, EventError> {
        if event::poll(timeout)? {
            Ok(translate(event::read()?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers, MouseEvent};

    fn mouse(kind: MouseEventKind) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_translate_key() {
        let key = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(translate(Event::Key(key)), Some(AppEvent::Key(key)));
    }

    #[test]
    fn test_translate_wheel() {
        assert_eq!(
            translate(mouse(MouseEventKind::ScrollDown)),
            Some(AppEvent::Scroll(WHEEL_ROWS))
        );
        assert_eq!(
            translate(mouse(MouseEventKind::ScrollUp)),
            Some(AppEvent::Scroll(-WHEEL_ROWS))
        );
        assert_eq!(translate(mouse(MouseEventKind::Moved)), None);
    }

    #[test]
    fn test_translate_resize_and_focus() {
        assert_eq!(translate(Event::Resize(100, 40)), Some(AppEvent::Resize(100, 40)));
        assert_eq!(translate(Event::FocusGained), None);
    }
}
