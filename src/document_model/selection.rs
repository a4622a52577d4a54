use super::document::Document;
use super::movement::Motion;
use super::text_buffer::Position;

/// A normalized selection: `tail` never comes after `head` by linear index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub tail: Position,
    pub head: Position,
}

impl Selection {
    /// Orders the endpoints by linear index. Collapsed spans are `None`.
    pub fn normalized(a: Position, b: Position, document: &Document) -> Option<Self> {
        let (a_index, b_index) = (document.position_to_index(a), document.position_to_index(b));
        match a_index.cmp(&b_index) {
            std::cmp::Ordering::Less => Some(Self { tail: a, head: b }),
            std::cmp::Ordering::Greater => Some(Self { tail: b, head: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn is_line_in_selection(&self, line: usize) -> bool {
        line >= self.tail.line && line <= self.head.line
    }

    /// Selected column span `[start, end)` on one line, if any.
    pub fn get_selected_range_for_line(&self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if !self.is_line_in_selection(line) {
            return None;
        }
        let left = if line == self.tail.line { self.tail.column } else { 0 };
        let right = if line == self.head.line {
            self.head.column.min(line_len)
        } else {
            line_len
        };
        (left < right).then_some((left, right))
    }
}

/// Owner of the optional selection region for a session.
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    region: Option<Selection>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self { region: None }
    }

    pub fn region(&self) -> Option<Selection> {
        self.region
    }

    pub fn is_active(&self) -> bool {
        self.region.is_some()
    }

    pub fn clear(&mut self) {
        self.region = None;
    }

    /// Selects the whole document and moves the cursor to the end of it.
    pub fn select_all(&mut self, document: &mut Document) {
        let start = Position::new(0, 0);
        let end = document.text_buffer().end_position();
        self.region = Selection::normalized(start, end, document);
        document.set_cursor(end);
    }

    /// Grows or shrinks the region by one `motion`.
    ///
    /// The endpoint under the cursor travels and the opposite endpoint stays
    /// put as the pivot, so reversing direction first shrinks the region and
    /// then grows it on the other side.
    pub fn extend(&mut self, document: &mut Document, motion: Motion, viewport_height: usize) {
        let cursor = document.cursor();
        let (pivot, moving) = match self.region {
            None => (cursor, cursor),
            Some(region) => Self::split_at_cursor(region, cursor, document),
        };

        let moved = document.motion_target(moving, motion, viewport_height);
        document.set_cursor(moved);
        self.region = Selection::normalized(pivot, moved, document);
    }

    fn split_at_cursor(region: Selection, cursor: Position, document: &Document) -> (Position, Position) {
        if cursor == region.head {
            return (region.tail, region.head);
        }
        if cursor == region.tail {
            return (region.head, region.tail);
        }
        let at = document.position_to_index(cursor);
        let to_tail = at.abs_diff(document.position_to_index(region.tail));
        let to_head = at.abs_diff(document.position_to_index(region.head));
        if to_tail < to_head {
            (region.head, region.tail)
        } else {
            (region.tail, region.head)
        }
    }

    pub fn selected_text(&self, document: &Document) -> Option<String> {
        self.region
            .map(|region| document.text_range(region.tail, region.head))
    }

    /// Removes the selected span, leaving the cursor at the tail.
    pub fn delete_selected(&mut self, document: &mut Document) -> Option<String> {
        let region = self.region.take()?;
        Some(document.delete_range(region.tail, region.head))
    }
}
