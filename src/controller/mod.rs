/// Controller subsystem - Handles user input and drives the edit session
///
/// Key decoding, clipboard access, timers and exit hooks live here, along
/// with the session state machine that ties them to the document and view.

pub mod clipboard;
pub mod command_types;
pub mod editor;
pub mod event_source;
pub mod hooks;
pub mod key_handler;
pub mod timers;

// Re-export public interface
pub use clipboard::{ClipboardBridge, MemoryClipboard, SystemClipboard};
pub use command_types::KeyAction;
pub use editor::{EditOptions, Session, edit, edit_with_hooks};
pub use event_source::{CrosstermEvents, EventSource, InputEvent};
pub use hooks::{ExitHook, ExitHooks};
pub use key_handler::KeyHandler;
