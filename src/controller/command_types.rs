use crate::document_model::Motion;

/// Every action a key can trigger in an edit session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation; plain moves drop the selection, shifted moves extend it
    Move(Motion),
    Select(Motion),
    SelectAll,

    // Editing
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteForward,
    DeleteBackward,

    // Clipboard
    Copy,
    Cut,
    Paste,

    Redraw,
    Exit,
}
