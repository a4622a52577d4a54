use crate::controller::command_types::KeyAction;
use crate::document_model::Motion;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    /// Decodes a terminal key event. Releases and unbound keys yield `None`.
    pub fn parse_key(key_event: &KeyEvent) -> Option<KeyAction> {
        if key_event.kind == KeyEventKind::Release {
            return None;
        }

        let modifiers = key_event.modifiers;
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        if let Some(motion) = Self::parse_motion(key_event.code, ctrl) {
            return Some(if shift {
                KeyAction::Select(motion)
            } else {
                KeyAction::Move(motion)
            });
        }

        match key_event.code {
            // Control chords first (more specific)
            KeyCode::Char(c) if ctrl => Self::parse_control_key(c),
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::ALT) => None,
            KeyCode::Char(c) => Some(KeyAction::InsertChar(c)),

            KeyCode::Enter => Some(KeyAction::InsertNewline),
            KeyCode::Tab => Some(KeyAction::InsertTab),
            KeyCode::Delete => Some(KeyAction::DeleteForward),
            KeyCode::Backspace => Some(KeyAction::DeleteBackward),
            _ => None,
        }
    }

    fn parse_motion(code: KeyCode, ctrl: bool) -> Option<Motion> {
        match code {
            KeyCode::Left => Some(Motion::Left),
            KeyCode::Right => Some(Motion::Right),
            KeyCode::Up => Some(Motion::Up),
            KeyCode::Down => Some(Motion::Down),
            KeyCode::Home if ctrl => Some(Motion::DocumentStart),
            KeyCode::End if ctrl => Some(Motion::DocumentEnd),
            KeyCode::Home => Some(Motion::LineStart),
            KeyCode::End => Some(Motion::LineEnd),
            KeyCode::PageUp => Some(Motion::PageUp),
            KeyCode::PageDown => Some(Motion::PageDown),
            _ => None,
        }
    }

    fn parse_control_key(c: char) -> Option<KeyAction> {
        match c.to_ascii_lowercase() {
            'c' => Some(KeyAction::Copy),
            'x' => Some(KeyAction::Cut),
            'v' => Some(KeyAction::Paste),
            'a' => Some(KeyAction::SelectAll),
            'l' => Some(KeyAction::Redraw),
            'd' | 'q' => Some(KeyAction::Exit),
            _ => None,
        }
    }
}
