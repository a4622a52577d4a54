/// View subsystem - Independent rendering and display management
///
/// The editing core talks to the screen only through the [`Renderer`] trait
/// and hands it document data through the [`ViewModel`] trait.

pub mod renderer;
pub mod view_model;

// Re-export public interface
pub use renderer::{BarPosition, Renderer, TerminalRenderer};
pub use view_model::{CursorPosition, DocumentViewModel, ViewModel};
