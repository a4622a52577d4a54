/// Document model subsystem - Core data structures and text operations
///
/// This module contains the line buffer, the cursor and its movements, and
/// the selection region algebra.

pub mod document;
pub mod movement;
pub mod selection;
pub mod text_buffer;

// Re-export main types for convenience
pub use document::Document;
pub use movement::Motion;
pub use selection::{Selection, SelectionModel};
pub use text_buffer::{Position, TextBuffer};
