/// View Model - Abstracts document data for the view layer
/// This keeps renderers independent of Document internals
use crate::document_model::{Document, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

/// Everything a renderer needs to paint the text area.
pub trait ViewModel {
    fn get_cursor_position(&self) -> CursorPosition;

    fn get_line_count(&self) -> usize;

    fn get_line(&self, line_number: usize) -> Option<&str>;

    fn get_selection(&self) -> Option<Selection>;
}

/// Adapts a document and its selection to [`ViewModel`].
pub struct DocumentViewModel<'a> {
    document: &'a Document,
    selection: Option<Selection>,
}

impl<'a> DocumentViewModel<'a> {
    pub fn new(document: &'a Document, selection: Option<Selection>) -> Self {
        Self { document, selection }
    }
}

impl ViewModel for DocumentViewModel<'_> {
    fn get_cursor_position(&self) -> CursorPosition {
        CursorPosition {
            line: self.document.cursor_line,
            column: self.document.cursor_column,
        }
    }

    fn get_line_count(&self) -> usize {
        self.document.line_count()
    }

    fn get_line(&self, line_number: usize) -> Option<&str> {
        self.document.get_line(line_number)
    }

    fn get_selection(&self) -> Option<Selection> {
        self.selection
    }
}
