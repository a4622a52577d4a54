/// Configuration subsystem - Editor settings and preferences
///
/// This module handles loading settings from .termitrc files.

pub mod rc;

// Re-export public interface
pub use rc::{ClipboardKind, RcConfig, RcLoader};
