use thiserror::Error;

/// Failure talking to the system clipboard.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("clipboard access failed: {0}")]
    Access(String),
}

/// A key action that could not complete. The session reports it on the
/// status bar and keeps running.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    #[error("nothing to paste")]
    NothingToPaste,
    #[error("{0}")]
    Hook(String),
}

/// The renderer could not paint or resize. Ends the session.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("terminal output failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("reading terminal input failed: {0}")]
    Input(#[source] std::io::Error),
}
