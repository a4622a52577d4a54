use super::document::Document;
use super::text_buffer::Position;

/// A unit of cursor travel, shared by plain and shift navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
    PageUp,
    PageDown,
    DocumentStart,
    DocumentEnd,
}

impl Document {
    /// Where `motion` takes a cursor standing at `from`.
    ///
    /// Left stops at column 0 instead of wrapping to the previous row, while
    /// Right wraps to the start of the next row.
    pub fn motion_target(&self, from: Position, motion: Motion, viewport_height: usize) -> Position {
        let last_line = self.line_count() - 1;
        let line_len = self.get_line_length(from.line);
        let half_page = viewport_height / 2;

        match motion {
            Motion::Left => Position::new(from.line, from.column.saturating_sub(1)),
            Motion::Right => {
                if from.column < line_len {
                    Position::new(from.line, from.column + 1)
                } else if from.line < last_line {
                    Position::new(from.line + 1, 0)
                } else {
                    from
                }
            }
            Motion::Up => {
                if from.line > 0 {
                    self.column_clamped(from.line - 1, from.column)
                } else {
                    from
                }
            }
            Motion::Down => {
                if from.line < last_line {
                    self.column_clamped(from.line + 1, from.column)
                } else {
                    from
                }
            }
            Motion::LineStart => Position::new(from.line, 0),
            Motion::LineEnd => Position::new(from.line, line_len),
            Motion::PageUp => self.column_clamped(from.line.saturating_sub(half_page), from.column),
            Motion::PageDown => self.column_clamped((from.line + half_page).min(last_line), from.column),
            Motion::DocumentStart => Position::new(0, 0),
            Motion::DocumentEnd => Position::new(last_line, self.get_line_length(last_line)),
        }
    }

    fn column_clamped(&self, line: usize, column: usize) -> Position {
        Position::new(line, column.min(self.get_line_length(line)))
    }

    pub fn apply_motion(&mut self, motion: Motion, viewport_height: usize) {
        let target = self.motion_target(self.cursor(), motion, viewport_height);
        self.set_cursor(target);
    }

    pub fn move_cursor_up(&mut self) {
        self.apply_motion(Motion::Up, 0);
    }

    pub fn move_cursor_down(&mut self) {
        self.apply_motion(Motion::Down, 0);
    }

    pub fn move_cursor_left(&mut self) {
        self.apply_motion(Motion::Left, 0);
    }

    pub fn move_cursor_right(&mut self) {
        self.apply_motion(Motion::Right, 0);
    }

    pub fn move_line_start(&mut self) {
        self.apply_motion(Motion::LineStart, 0);
    }

    pub fn move_line_end(&mut self) {
        self.apply_motion(Motion::LineEnd, 0);
    }

    pub fn move_document_start(&mut self) {
        self.apply_motion(Motion::DocumentStart, 0);
    }

    pub fn move_document_end(&mut self) {
        self.apply_motion(Motion::DocumentEnd, 0);
    }

    pub fn move_page_up(&mut self, viewport_height: usize) {
        self.apply_motion(Motion::PageUp, viewport_height);
    }

    pub fn move_page_down(&mut self, viewport_height: usize) {
        self.apply_motion(Motion::PageDown, viewport_height);
    }
}
