/// Line storage for a single edit session.
///
/// Columns are counted in `char`s. The linear index of a position counts one
/// unit for every line separator, so each index in `0..=total_len()` names
/// exactly one position.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
}

/// Converts `\r\n` and lone `\r` into `\n`.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(offset, _)| offset)
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
        }
    }

    pub fn from_string(content: &str) -> Self {
        let normalized = normalize_line_endings(content);
        Self {
            lines: normalized.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn get_line(&self, line_number: usize) -> Option<&str> {
        self.lines.get(line_number).map(String::as_str)
    }

    pub fn line_length(&self, line_number: usize) -> usize {
        self.get_line(line_number).map_or(0, |line| line.chars().count())
    }

    pub fn get_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Width of the longest line and number of lines.
    pub fn content_size(&self) -> (usize, usize) {
        let width = (0..self.line_count())
            .map(|line| self.line_length(line))
            .max()
            .unwrap_or(0);
        (width, self.line_count())
    }

    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.line_length(last))
    }

    pub fn total_len(&self) -> usize {
        self.position_to_index(self.end_position())
    }

    /// Pulls a position back inside the buffer.
    pub fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.line_count() - 1);
        Position::new(line, pos.column.min(self.line_length(line)))
    }

    /// Prefix sum over the preceding lines, recomputed on every call.
    pub fn position_to_index(&self, pos: Position) -> usize {
        let pos = self.clamp(pos);
        let preceding: usize = (0..pos.line).map(|line| self.line_length(line) + 1).sum();
        preceding + pos.column
    }

    /// Inverse of [`position_to_index`](Self::position_to_index). Indices past
    /// the end land on the end of the document.
    pub fn index_to_position(&self, index: usize) -> Position {
        let mut remaining = index;
        for line in 0..self.line_count() {
            let len = self.line_length(line);
            if remaining <= len {
                return Position::new(line, remaining);
            }
            remaining -= len + 1;
        }
        self.end_position()
    }

    /// Inserts `text` at `pos` and returns the position just past it.
    pub fn insert(&mut self, pos: Position, text: &str) -> Position {
        let pos = self.clamp(pos);
        let normalized = normalize_line_endings(text);
        let current = &mut self.lines[pos.line];
        let split_at = byte_offset(current, pos.column);
        let tail = current.split_off(split_at);

        let mut pieces = normalized.split('\n');
        let first = pieces.next().unwrap_or_default();
        current.push_str(first);

        let rest: Vec<String> = pieces.map(str::to_string).collect();
        if rest.is_empty() {
            let column = pos.column + first.chars().count();
            current.push_str(&tail);
            return Position::new(pos.line, column);
        }

        let end_line = pos.line + rest.len();
        let end_column = rest.last().map_or(0, |last| last.chars().count());
        for (offset, piece) in rest.into_iter().enumerate() {
            self.lines.insert(pos.line + 1 + offset, piece);
        }
        self.lines[end_line].push_str(&tail);
        Position::new(end_line, end_column)
    }

    pub fn insert_newline(&mut self, pos: Position) -> Position {
        self.insert(pos, "\n")
    }

    /// Text between two positions, in either order.
    pub fn text_range(&self, start: Position, end: Position) -> String {
        let (start, end) = self.ordered(start, end);
        if start.line == end.line {
            return self.lines[start.line]
                .chars()
                .skip(start.column)
                .take(end.column - start.column)
                .collect();
        }

        let mut result: String = self.lines[start.line].chars().skip(start.column).collect();
        for line in &self.lines[start.line + 1..end.line] {
            result.push('\n');
            result.push_str(line);
        }
        result.push('\n');
        result.extend(self.lines[end.line].chars().take(end.column));
        result
    }

    /// Removes the text between two positions and returns it.
    pub fn delete_range(&mut self, start: Position, end: Position) -> String {
        let (start, end) = self.ordered(start, end);
        let removed = self.text_range(start, end);

        let end_line = &self.lines[end.line];
        let tail = end_line[byte_offset(end_line, end.column)..].to_string();
        let head_line = &mut self.lines[start.line];
        head_line.truncate(byte_offset(head_line, start.column));
        head_line.push_str(&tail);
        self.lines.drain(start.line + 1..=end.line);

        removed
    }

    fn ordered(&self, a: Position, b: Position) -> (Position, Position) {
        let (a, b) = (self.clamp(a), self.clamp(b));
        if self.position_to_index(a) <= self.position_to_index(b) {
            (a, b)
        } else {
            (b, a)
        }
    }

    #[cfg(test)]
    pub fn from_lines(lines: &[&str]) -> Self {
        Self::from_string(&lines.join("\n"))
    }

    #[cfg(test)]
    pub fn get_lines(&self) -> Vec<String> {
        self.lines.clone()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
