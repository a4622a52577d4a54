use crossterm::event::{self, Event, KeyEvent};
use std::io;
use std::time::Duration;

/// A decoded terminal event the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

pub trait EventSource {
    /// Waits up to `timeout` (forever when `None`) for the next event.
    /// `Ok(None)` means the wait elapsed or an ignored event arrived.
    fn poll_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<InputEvent>>;
}

/// Events from the controlling terminal.
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<InputEvent>> {
        if let Some(timeout) = timeout {
            if !event::poll(timeout)? {
                return Ok(None);
            }
        }

        Ok(match event::read()? {
            Event::Key(key_event) => Some(InputEvent::Key(key_event)),
            Event::Resize(width, height) => Some(InputEvent::Resize(width, height)),
            // Ignore other events (mouse, focus, bracketed paste)
            _ => None,
        })
    }
}
