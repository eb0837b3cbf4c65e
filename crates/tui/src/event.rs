//! Event handling and key mappings.
//!
//! This module polls the terminal for input and converts events into
//! application messages.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use headway_protocol::Message;

/// Polls for a terminal event, waiting at most `timeout`.
///
/// Returns `Some(Event)` if an event is available within the timeout,
/// or `None` if the timeout expires without an event.
///
/// # Errors
///
/// Returns an error if polling the terminal fails.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Converts a terminal event to an application message.
///
/// Returns `None` for events the sign ignores.
#[must_use]
pub fn event_to_message(event: &Event) -> Option<Message> {
    match event {
        Event::Key(key) => key_to_message(*key),
        Event::Resize(width, height) => Some(Message::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

/// Converts a key press to an application message.
///
/// # Key Bindings
///
/// | Key | Action |
/// |-----|--------|
/// | `q` or `Ctrl+C` | Quit |
/// | `r` | Refresh now |
#[must_use]
pub fn key_to_message(key: KeyEvent) -> Option<Message> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    match key.code {
        KeyCode::Char('q') => Some(Message::Quit),
        KeyCode::Char('r') => Some(Message::Refresh),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_keys() {
        assert_eq!(
            key_to_message(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Message::Quit)
        );
        assert_eq!(key_to_message(make_key(KeyCode::Char('q'))), Some(Message::Quit));
    }

    #[test]
    fn plain_c_is_not_quit() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('c'))), None);
    }

    #[test]
    fn refresh_key() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('r'))), Some(Message::Refresh));
    }

    #[test]
    fn key_release_ignored() {
        let mut key = make_key(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(key_to_message(key), None);
    }

    #[test]
    fn unmapped_keys_return_none() {
        assert_eq!(key_to_message(make_key(KeyCode::Char('x'))), None);
        assert_eq!(key_to_message(make_key(KeyCode::Enter)), None);
    }

    #[test]
    fn resize_events_become_messages() {
        assert_eq!(
            event_to_message(&Event::Resize(80, 24)),
            Some(Message::Resize {
                width: 80,
                height: 24
            })
        );
    }

    #[test]
    fn focus_events_ignored() {
        assert_eq!(event_to_message(&Event::FocusGained), None);
    }
}
