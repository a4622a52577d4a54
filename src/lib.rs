//! An in-terminal text editing engine.
//!
//! [`edit`] takes over the terminal, lets the user edit a piece of text with
//! familiar desktop keys, and returns the final text when the user exits.

pub mod config;
pub mod controller;
pub mod document_model;
pub mod error;
pub mod view;

pub use controller::{EditOptions, ExitHook, ExitHooks, Session, edit, edit_with_hooks};
pub use error::{ActionError, ClipboardError, EditorError, RenderError};
