use super::view_model::ViewModel;
use crate::error::RenderError;
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode, size,
    },
};
use std::io::{Write, stdout};
use unicode_width::UnicodeWidthChar;

/// Screen row of the first text line; row 0 holds the title bar.
const TEXT_TOP: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPosition {
    Title,
    Status,
}

/// Paints the session onto a surface. The editing core only ever asks for
/// these operations and never writes to the terminal itself.
pub trait Renderer {
    /// Repaints the text area. With `delta_only`, rows that did not change
    /// are left alone.
    fn draw(&mut self, view: &dyn ViewModel, delta_only: bool) -> Result<(), RenderError>;

    /// Moves the visible cursor, scrolling the viewport if it left the screen.
    fn draw_cursor(&mut self, view: &dyn ViewModel) -> Result<(), RenderError>;

    fn resize(&mut self, width: u16, height: u16) -> Result<(), RenderError>;

    fn show_bar(&mut self, position: BarPosition, text: &str, inverted: bool) -> Result<(), RenderError>;

    /// Number of text rows currently visible.
    fn viewport_height(&self) -> usize;

    /// Hands the terminal back to the shell.
    fn teardown(&mut self) -> Result<(), RenderError>;
}

/// Crossterm renderer with a title bar, a text area and a status bar.
pub struct TerminalRenderer {
    last_lines: Vec<String>,
    last_cursor_pos: (u16, u16),
    width: u16,
    height: u16,
    scroll_offset: usize,
    horizontal_scroll: usize,
    needs_full_redraw: bool,
    tab_stop: usize,
    active: bool,
}

impl TerminalRenderer {
    pub fn new(tab_stop: usize) -> Result<Self, RenderError> {
        let (width, height) = size()?;
        Ok(Self::with_size(width, height, tab_stop))
    }

    pub fn with_size(width: u16, height: u16, tab_stop: usize) -> Self {
        Self {
            last_lines: Vec::new(),
            last_cursor_pos: (0, TEXT_TOP as u16),
            width,
            height,
            scroll_offset: 0,
            horizontal_scroll: 0,
            needs_full_redraw: true,
            tab_stop: tab_stop.max(1),
            active: false,
        }
    }

    /// Switches to the alternate screen in raw mode.
    pub fn enter(&mut self) -> Result<(), RenderError> {
        execute!(stdout(), EnterAlternateScreen)?;
        enable_raw_mode()?;
        self.active = true;
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    fn char_width(&self, ch: char, display_col: usize) -> usize {
        match ch {
            '\t' => self.tab_stop - display_col % self.tab_stop,
            c if c.is_control() => 1,
            c => c.width().unwrap_or(1),
        }
    }

    /// Convert logical character position to display column position
    /// Accounts for tab expansion and Unicode character widths
    fn calculate_display_column(&self, text: &str, logical_pos: usize) -> usize {
        text.chars()
            .take(logical_pos)
            .fold(0, |col, ch| col + self.char_width(ch, col))
    }

    /// Renders one document line for the visible columns, reversing the
    /// selected `[start, end)` character span.
    fn render_line(&self, text: &str, selected: Option<(usize, usize)>) -> String {
        let mut result = String::new();
        let right_edge = self.horizontal_scroll + self.width as usize;
        let mut display_col = 0;
        let mut reversed = false;

        for (index, ch) in text.chars().enumerate() {
            let start = display_col;
            let ch_width = self.char_width(ch, start);
            display_col += ch_width;
            if start < self.horizontal_scroll {
                continue;
            }
            if display_col > right_edge {
                break;
            }

            let in_selection = selected.is_some_and(|(from, to)| index >= from && index < to);
            if in_selection != reversed {
                let attribute = if in_selection { Attribute::Reverse } else { Attribute::NoReverse };
                result.push_str(&SetAttribute(attribute).to_string());
                reversed = in_selection;
            }

            match ch {
                '\t' => result.push_str(&" ".repeat(ch_width)),
                c if c.is_control() => result.push('?'),
                c => result.push(c),
            }
        }

        if reversed {
            result.push_str(&SetAttribute(Attribute::NoReverse).to_string());
        }
        result
    }

    /// Returns true when the viewport moved.
    fn adjust_scroll_to_cursor(&mut self, view: &dyn ViewModel) -> bool {
        let visible_lines = self.viewport_height().max(1);
        let width = (self.width as usize).max(1);
        let cursor_pos = view.get_cursor_position();
        let before = (self.scroll_offset, self.horizontal_scroll);

        if cursor_pos.line < self.scroll_offset {
            self.scroll_offset = cursor_pos.line;
        } else if cursor_pos.line >= self.scroll_offset + visible_lines {
            self.scroll_offset = cursor_pos.line - visible_lines + 1;
        }

        let line = view.get_line(cursor_pos.line).unwrap_or_default();
        let cursor_col = self.calculate_display_column(line, cursor_pos.column);
        if cursor_col < self.horizontal_scroll {
            self.horizontal_scroll = cursor_col;
        } else if cursor_col >= self.horizontal_scroll + width {
            self.horizontal_scroll = cursor_col - width + 1;
        }

        let moved = before != (self.scroll_offset, self.horizontal_scroll);
        if moved {
            self.needs_full_redraw = true;
        }
        moved
    }

    fn visible_lines(&self, view: &dyn ViewModel) -> Vec<String> {
        let selection = view.get_selection();
        let line_count = view.get_line_count();
        (0..self.viewport_height())
            .map(|row| self.scroll_offset + row)
            .map(|doc_line| {
                if doc_line >= line_count {
                    return String::new();
                }
                let text = view.get_line(doc_line).unwrap_or_default();
                let line_len = text.chars().count();
                let selected = selection.and_then(|s| s.get_selected_range_for_line(doc_line, line_len));
                self.render_line(text, selected)
            })
            .collect()
    }

    fn paint_lines(&mut self, view: &dyn ViewModel) -> Result<(), RenderError> {
        if self.needs_full_redraw {
            self.last_lines.clear();
            self.needs_full_redraw = false;
        }

        let visible_lines = self.visible_lines(view);
        let mut out = stdout();
        for (row, line) in visible_lines.iter().enumerate() {
            if self.last_lines.get(row) != Some(line) {
                queue!(
                    out,
                    cursor::MoveTo(0, (row + TEXT_TOP) as u16),
                    Clear(ClearType::CurrentLine),
                    Print(line)
                )?;
            }
        }
        self.last_lines = visible_lines;
        Ok(())
    }

    fn place_cursor(&mut self, view: &dyn ViewModel) -> Result<(), RenderError> {
        let cursor_pos = view.get_cursor_position();
        let line = view.get_line(cursor_pos.line).unwrap_or_default();
        let display_column = self.calculate_display_column(line, cursor_pos.column);
        let screen_line = cursor_pos.line.saturating_sub(self.scroll_offset) + TEXT_TOP;
        let screen_column = display_column.saturating_sub(self.horizontal_scroll);

        self.last_cursor_pos = (screen_column as u16, screen_line as u16);
        queue!(stdout(), cursor::MoveTo(self.last_cursor_pos.0, self.last_cursor_pos.1))?;
        Ok(())
    }
}

impl Renderer for TerminalRenderer {
    fn draw(&mut self, view: &dyn ViewModel, delta_only: bool) -> Result<(), RenderError> {
        if !delta_only {
            self.needs_full_redraw = true;
        }
        self.adjust_scroll_to_cursor(view);
        self.paint_lines(view)?;
        self.place_cursor(view)?;
        stdout().flush()?;
        Ok(())
    }

    fn draw_cursor(&mut self, view: &dyn ViewModel) -> Result<(), RenderError> {
        if self.adjust_scroll_to_cursor(view) {
            self.paint_lines(view)?;
        }
        self.place_cursor(view)?;
        stdout().flush()?;
        Ok(())
    }

    fn resize(&mut self, width: u16, height: u16) -> Result<(), RenderError> {
        self.width = width;
        self.height = height;
        self.needs_full_redraw = true;
        self.last_lines.clear();
        if self.active {
            execute!(stdout(), Clear(ClearType::All))?;
        }
        Ok(())
    }

    fn show_bar(&mut self, position: BarPosition, text: &str, inverted: bool) -> Result<(), RenderError> {
        let row = match position {
            BarPosition::Title => 0,
            BarPosition::Status => self.height.saturating_sub(1),
        };
        let message: String = format!(" {text}").chars().take(self.width as usize).collect();

        let mut out = stdout();
        queue!(out, cursor::MoveTo(0, row), ResetColor, SetAttribute(Attribute::Reset))?;
        if inverted {
            queue!(out, SetForegroundColor(Color::White))?;
        } else {
            queue!(out, SetBackgroundColor(Color::White), SetForegroundColor(Color::Black))?;
        }
        queue!(
            out,
            SetAttribute(Attribute::Bold),
            Clear(ClearType::CurrentLine),
            Print(message),
            SetAttribute(Attribute::Reset),
            ResetColor,
            cursor::MoveTo(self.last_cursor_pos.0, self.last_cursor_pos.1)
        )?;
        out.flush()?;
        Ok(())
    }

    fn viewport_height(&self) -> usize {
        (self.height as usize).saturating_sub(2)
    }

    fn teardown(&mut self) -> Result<(), RenderError> {
        if self.active {
            self.active = false;
            disable_raw_mode()?;
            execute!(stdout(), LeaveAlternateScreen, cursor::Show)?;
        }
        Ok(())
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        if self.active {
            let _ = disable_raw_mode();
            let _ = execute!(stdout(), LeaveAlternateScreen);
        }
    }
}
