use super::text_buffer::{Position, TextBuffer, normalize_line_endings};

/// A text buffer plus the edit cursor.
///
/// The cursor always satisfies `cursor_line < line_count()` and
/// `cursor_column <= get_line_length(cursor_line)`.
#[derive(Debug, Clone)]
pub struct Document {
    pub cursor_line: usize,
    pub cursor_column: usize,
    pub expand_tab: bool,
    pub tab_stop: usize,
    modified: bool,
    text_buffer: TextBuffer,
}

impl Document {
    pub fn new() -> Self {
        Self {
            cursor_line: 0,
            cursor_column: 0,
            expand_tab: false,
            tab_stop: 4,
            modified: false,
            text_buffer: TextBuffer::new(),
        }
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            text_buffer: TextBuffer::from_string(content),
            ..Self::new()
        }
    }

    pub fn text_buffer(&self) -> &TextBuffer {
        &self.text_buffer
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn line_count(&self) -> usize {
        self.text_buffer.line_count()
    }

    pub fn get_line(&self, line_num: usize) -> Option<&str> {
        self.text_buffer.get_line(line_num)
    }

    pub fn get_line_length(&self, line_num: usize) -> usize {
        self.text_buffer.line_length(line_num)
    }

    pub fn get_text(&self) -> String {
        self.text_buffer.get_text()
    }

    pub fn content_size(&self) -> (usize, usize) {
        self.text_buffer.content_size()
    }

    pub fn cursor(&self) -> Position {
        Position::new(self.cursor_line, self.cursor_column)
    }

    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.text_buffer.clamp(pos);
        self.cursor_line = pos.line;
        self.cursor_column = pos.column;
    }

    pub fn position_to_index(&self, pos: Position) -> usize {
        self.text_buffer.position_to_index(pos)
    }

    pub fn index_to_position(&self, index: usize) -> Position {
        self.text_buffer.index_to_position(index)
    }

    pub fn insert_char(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut utf8));
    }

    /// Inserts text at the cursor and leaves the cursor after it. Returns the
    /// number of characters inserted.
    pub fn insert_text(&mut self, text: &str) -> usize {
        let text = normalize_line_endings(text);
        if text.is_empty() {
            return 0;
        }
        let end = self.text_buffer.insert(self.cursor(), &text);
        self.set_cursor(end);
        self.modified = true;
        text.chars().count()
    }

    pub fn insert_newline(&mut self) {
        let end = self.text_buffer.insert_newline(self.cursor());
        self.set_cursor(end);
        self.modified = true;
    }

    pub fn insert_tab(&mut self) {
        if self.expand_tab {
            let spaces = " ".repeat(self.tab_stop);
            self.insert_text(&spaces);
        } else {
            self.insert_text("\t");
        }
    }

    /// Removes up to `count` units after the cursor. A unit at the end of a
    /// line is the line separator, so lines join.
    pub fn delete_forward(&mut self, count: usize) -> String {
        let start = self.position_to_index(self.cursor());
        let end = (start + count).min(self.text_buffer.total_len());
        if start == end {
            return String::new();
        }
        let end_pos = self.index_to_position(end);
        self.delete_range(self.cursor(), end_pos)
    }

    /// Removes up to `count` units before the cursor. A no-op at `(0, 0)`.
    pub fn delete_backward(&mut self, count: usize) -> String {
        let end = self.position_to_index(self.cursor());
        let start = end.saturating_sub(count);
        if start == end {
            return String::new();
        }
        let start_pos = self.index_to_position(start);
        self.delete_range(start_pos, self.cursor())
    }

    /// Removes a span and puts the cursor at its start.
    pub fn delete_range(&mut self, start: Position, end: Position) -> String {
        let (start, end) = if self.position_to_index(start) <= self.position_to_index(end) {
            (start, end)
        } else {
            (end, start)
        };
        let removed = self.text_buffer.delete_range(start, end);
        self.set_cursor(start);
        if !removed.is_empty() {
            self.modified = true;
        }
        removed
    }

    pub fn text_range(&self, start: Position, end: Position) -> String {
        self.text_buffer.text_range(start, end)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
