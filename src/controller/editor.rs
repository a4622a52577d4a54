use crate::config::{ClipboardKind, RcConfig};
use crate::controller::clipboard::{ClipboardBridge, MemoryClipboard, SystemClipboard, sanitize_paste_text};
use crate::controller::command_types::KeyAction;
use crate::controller::event_source::{CrosstermEvents, EventSource, InputEvent};
use crate::controller::hooks::{ExitHook, ExitHooks};
use crate::controller::key_handler::KeyHandler;
use crate::controller::timers::{PendingTimer, ResizeDebouncer};
use crate::document_model::{Document, SelectionModel};
use crate::error::{ActionError, EditorError, RenderError};
use crate::view::{BarPosition, DocumentViewModel, Renderer, TerminalRenderer};
use crossterm::event::KeyEvent;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

pub const DEFAULT_TITLE: &str = "Welcome to Termit - The TERMinal edITor!";
pub const DEFAULT_STATUS: &str = "Ctrl+D:exit  Ctrl+C:copy  Ctrl+X:cut  Ctrl+V:paste  Ctrl+A:select all";

#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    pub title: Option<String>,
    pub config: RcConfig,
}

/// What the renderer must do once an action has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Followup {
    Cursor,
    Delta,
    Full,
    Exit,
}

/// One interactive edit of a piece of text.
///
/// Events are handled one at a time and each handled key ends in a single
/// draw request. Action failures go to the status bar; renderer failures end
/// the session.
pub struct Session<R: Renderer, C: ClipboardBridge> {
    document: Document,
    selection: SelectionModel,
    renderer: R,
    clipboard: C,
    title: String,
    input_enabled: bool,
    status_timer: PendingTimer,
    status_timeout: Duration,
    resize: ResizeDebouncer,
    exit_hooks: ExitHooks,
    resolved: Option<String>,
}

impl<R: Renderer, C: ClipboardBridge> Session<R, C> {
    pub fn new(initial: &str, options: &EditOptions, renderer: R, clipboard: C) -> Self {
        let config = &options.config;
        let mut session = Self {
            document: Document::new(),
            selection: SelectionModel::new(),
            renderer,
            clipboard,
            title: options
                .title
                .clone()
                .or_else(|| config.title.clone())
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            input_enabled: true,
            status_timer: PendingTimer::new(),
            status_timeout: config.status_timeout(),
            resize: ResizeDebouncer::new(config.resize_debounce()),
            exit_hooks: ExitHooks::new(),
            resolved: None,
        };
        session.load(initial, config);
        session
    }

    fn load(&mut self, content: &str, config: &RcConfig) {
        let mut document = Document::from_text(content);
        document.expand_tab = config.expand_tab;
        document.tab_stop = config.tab_stop;
        self.document = document;
        self.selection.clear();
    }

    pub fn add_exit_hook(&mut self, hook: ExitHook) {
        self.exit_hooks.push(hook);
    }

    pub fn set_exit_hooks(&mut self, hooks: ExitHooks) {
        self.exit_hooks = hooks;
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    /// The final text, once the session has resolved.
    pub fn resolution(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    /// Paints the bars and the whole text area.
    pub fn start(&mut self) -> Result<(), RenderError> {
        self.renderer.show_bar(BarPosition::Status, DEFAULT_STATUS, false)?;
        self.renderer.show_bar(BarPosition::Title, &self.title, false)?;
        self.draw(false)
    }

    fn draw(&mut self, delta_only: bool) -> Result<(), RenderError> {
        let view = DocumentViewModel::new(&self.document, self.selection.region());
        self.renderer.draw(&view, delta_only)
    }

    fn draw_cursor(&mut self) -> Result<(), RenderError> {
        let view = DocumentViewModel::new(&self.document, self.selection.region());
        self.renderer.draw_cursor(&view)
    }

    pub fn handle_event(&mut self, event: InputEvent, now: Instant) -> Result<(), RenderError> {
        match event {
            InputEvent::Key(key_event) => self.handle_key(key_event, now),
            InputEvent::Resize(width, height) => {
                self.handle_resize(width, height, now);
                Ok(())
            }
        }
    }

    pub fn handle_key(&mut self, key_event: KeyEvent, now: Instant) -> Result<(), RenderError> {
        if !self.input_enabled {
            return Ok(());
        }
        match KeyHandler::parse_key(&key_event) {
            Some(action) => self.dispatch(action, now),
            None => Ok(()),
        }
    }

    pub fn dispatch(&mut self, action: KeyAction, now: Instant) -> Result<(), RenderError> {
        debug!(target: "editor.action", ?action, "dispatch");
        match self.apply(action) {
            Ok(Followup::Cursor) => self.draw_cursor(),
            Ok(Followup::Delta) => self.draw(true),
            Ok(Followup::Full) => self.draw(false),
            Ok(Followup::Exit) => self.exit(now),
            Err(err) => {
                self.report(&err, now)?;
                self.draw(true)
            }
        }
    }

    fn apply(&mut self, action: KeyAction) -> Result<Followup, ActionError> {
        let viewport_height = self.renderer.viewport_height();
        match action {
            KeyAction::Move(motion) => {
                let had_selection = self.selection.is_active();
                self.selection.clear();
                self.document.apply_motion(motion, viewport_height);
                Ok(if had_selection { Followup::Delta } else { Followup::Cursor })
            }
            KeyAction::Select(motion) => {
                self.selection.extend(&mut self.document, motion, viewport_height);
                Ok(Followup::Delta)
            }
            KeyAction::SelectAll => {
                self.selection.select_all(&mut self.document);
                Ok(Followup::Delta)
            }
            KeyAction::InsertChar(c) => {
                self.selection.delete_selected(&mut self.document);
                self.document.insert_char(c);
                Ok(Followup::Delta)
            }
            KeyAction::InsertNewline => {
                self.selection.delete_selected(&mut self.document);
                self.document.insert_newline();
                Ok(Followup::Delta)
            }
            KeyAction::InsertTab => {
                self.selection.delete_selected(&mut self.document);
                self.document.insert_tab();
                Ok(Followup::Delta)
            }
            KeyAction::DeleteForward => {
                if self.selection.delete_selected(&mut self.document).is_none() {
                    self.document.delete_forward(1);
                }
                Ok(Followup::Delta)
            }
            KeyAction::DeleteBackward => {
                if self.selection.delete_selected(&mut self.document).is_none() {
                    self.document.delete_backward(1);
                }
                Ok(Followup::Delta)
            }
            KeyAction::Copy => {
                self.copy_selection()?;
                Ok(Followup::Cursor)
            }
            KeyAction::Cut => {
                if self.copy_selection()? {
                    self.selection.delete_selected(&mut self.document);
                }
                Ok(Followup::Delta)
            }
            KeyAction::Paste => self.paste(),
            KeyAction::Redraw => Ok(Followup::Full),
            KeyAction::Exit => Ok(Followup::Exit),
        }
    }

    /// Returns whether anything was copied.
    fn copy_selection(&mut self) -> Result<bool, ActionError> {
        let Some(text) = self.selection.selected_text(&self.document) else {
            return Ok(false);
        };
        self.clipboard.write(&text)?;
        debug!(target: "editor.clipboard", chars = text.chars().count(), "selection copied");
        Ok(true)
    }

    /// Reads the clipboard before touching the document, so a failed read
    /// changes nothing.
    fn paste(&mut self) -> Result<Followup, ActionError> {
        let text = sanitize_paste_text(&self.clipboard.read()?);
        if text.is_empty() {
            return Err(ActionError::NothingToPaste);
        }
        self.selection.delete_selected(&mut self.document);
        let inserted = self.document.insert_text(&text);
        debug!(target: "editor.clipboard", chars = inserted, "pasted");
        Ok(Followup::Delta)
    }

    fn report(&mut self, err: &ActionError, now: Instant) -> Result<(), RenderError> {
        warn!(target: "editor.action", %err, "action failed");
        self.show_status(&format!("Error: {err}"), now)
    }

    /// Shows a transient status message until the status timer fires.
    pub fn show_status(&mut self, message: &str, now: Instant) -> Result<(), RenderError> {
        self.renderer.show_bar(BarPosition::Status, message, true)?;
        self.status_timer.start(now, self.status_timeout);
        Ok(())
    }

    fn restore_status(&mut self) -> Result<(), RenderError> {
        self.status_timer.cancel();
        self.renderer.show_bar(BarPosition::Status, DEFAULT_STATUS, false)
    }

    pub fn handle_resize(&mut self, width: u16, height: u16, now: Instant) {
        if self.resolved.is_some() {
            return;
        }
        debug!(target: "editor.resize", width, height, "resize queued");
        self.resize.notify(width, height, now);
    }

    /// Earliest moment a pending timer wants to fire.
    pub fn next_deadline(&self) -> Option<Instant> {
        [self.status_timer.deadline(), self.resize.deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    pub fn fire_due_timers(&mut self, now: Instant) -> Result<(), RenderError> {
        if self.status_timer.fire_if_due(now) {
            self.restore_status()?;
        }
        if let Some((width, height)) = self.resize.take_due(now) {
            self.apply_resize(width, height)?;
        }
        Ok(())
    }

    fn apply_resize(&mut self, width: u16, height: u16) -> Result<(), RenderError> {
        info!(target: "editor.resize", width, height, "resize applied");
        self.renderer.resize(width, height)?;
        self.restore_status()?;
        self.renderer.show_bar(BarPosition::Title, &self.title, false)?;
        self.draw(false)
    }

    /// Runs the exit hooks, then tears the renderer down and resolves with the
    /// current text. A failing hook keeps the session open.
    fn exit(&mut self, now: Instant) -> Result<(), RenderError> {
        let text = self.document.get_text();
        if let Err(err) = self.exit_hooks.run(&text) {
            self.report(&err, now)?;
            return self.draw(true);
        }

        self.input_enabled = false;
        self.status_timer.cancel();
        self.resize.cancel();
        self.renderer.teardown()?;
        info!(
            target: "editor.session",
            lines = self.document.line_count(),
            modified = self.document.is_modified(),
            "session resolved"
        );
        self.resolved = Some(text);
        Ok(())
    }

    /// Drives the session until it resolves or fails.
    pub fn run<S: EventSource>(mut self, source: &mut S) -> Result<String, EditorError> {
        let result = self.run_loop(source);
        if let Err(err) = &result {
            error!(target: "editor.session", %err, "session failed");
        }
        result
    }

    fn run_loop<S: EventSource>(&mut self, source: &mut S) -> Result<String, EditorError> {
        info!(target: "editor.session", lines = self.document.line_count(), "session started");
        self.start()?;

        loop {
            self.fire_due_timers(Instant::now())?;

            let timeout = self
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()));
            if let Some(event) = source.poll_event(timeout).map_err(EditorError::Input)? {
                self.handle_event(event, Instant::now())?;
            }

            if let Some(text) = self.resolved.take() {
                return Ok(text);
            }
        }
    }
}

/// Edits `initial` in the controlling terminal and returns the final text.
pub fn edit(initial: &str, options: EditOptions) -> Result<String, EditorError> {
    edit_with_hooks(initial, options, ExitHooks::new())
}

/// Like [`edit`], running `hooks` before the session is allowed to resolve.
pub fn edit_with_hooks(initial: &str, options: EditOptions, hooks: ExitHooks) -> Result<String, EditorError> {
    let mut renderer = TerminalRenderer::new(options.config.tab_stop)?;
    renderer.enter()?;
    let clipboard: Box<dyn ClipboardBridge> = match options.config.clipboard {
        ClipboardKind::System => Box::new(SystemClipboard::new()),
        ClipboardKind::Internal => Box::new(MemoryClipboard::new()),
    };

    let mut session = Session::new(initial, &options, renderer, clipboard);
    session.set_exit_hooks(hooks);
    session.run(&mut CrosstermEvents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::clipboard::MemoryClipboard;
    use crate::document_model::{Position, Selection};
    use crate::error::ClipboardError;
    use crate::view::ViewModel;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::collections::VecDeque;
    use std::io;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Draw { delta_only: bool },
        DrawCursor,
        Resize(u16, u16),
        Bar(BarPosition, String, bool),
        Teardown,
    }

    struct RecordingRenderer {
        calls: Vec<Call>,
        viewport: usize,
        fail_draw: bool,
    }

    impl RecordingRenderer {
        fn new() -> Self {
            Self {
                calls: Vec::new(),
                viewport: 20,
                fail_draw: false,
            }
        }

        fn draws(&self) -> usize {
            self.calls
                .iter()
                .filter(|call| matches!(call, Call::Draw { .. } | Call::DrawCursor))
                .count()
        }

        fn last_status(&self) -> Option<(String, bool)> {
            self.calls.iter().rev().find_map(|call| match call {
                Call::Bar(BarPosition::Status, text, inverted) => Some((text.clone(), *inverted)),
                _ => None,
            })
        }
    }

    impl Renderer for RecordingRenderer {
        fn draw(&mut self, _view: &dyn ViewModel, delta_only: bool) -> Result<(), RenderError> {
            if self.fail_draw {
                return Err(RenderError::Io(io::Error::other("terminal gone")));
            }
            self.calls.push(Call::Draw { delta_only });
            Ok(())
        }

        fn draw_cursor(&mut self, _view: &dyn ViewModel) -> Result<(), RenderError> {
            self.calls.push(Call::DrawCursor);
            Ok(())
        }

        fn resize(&mut self, width: u16, height: u16) -> Result<(), RenderError> {
            self.calls.push(Call::Resize(width, height));
            Ok(())
        }

        fn show_bar(&mut self, position: BarPosition, text: &str, inverted: bool) -> Result<(), RenderError> {
            self.calls.push(Call::Bar(position, text.to_string(), inverted));
            Ok(())
        }

        fn viewport_height(&self) -> usize {
            self.viewport
        }

        fn teardown(&mut self) -> Result<(), RenderError> {
            self.calls.push(Call::Teardown);
            Ok(())
        }
    }

    struct FailingClipboard;

    impl ClipboardBridge for FailingClipboard {
        fn write(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }

        fn read(&mut self) -> Result<String, ClipboardError> {
            Err(ClipboardError::Unavailable("no display".to_string()))
        }
    }

    struct ScriptedEvents(VecDeque<InputEvent>);

    impl EventSource for ScriptedEvents {
        fn poll_event(&mut self, _timeout: Option<Duration>) -> io::Result<Option<InputEvent>> {
            self.0
                .pop_front()
                .map(Some)
                .ok_or_else(|| io::Error::other("script exhausted"))
        }
    }

    fn session(text: &str) -> Session<RecordingRenderer, MemoryClipboard> {
        Session::new(text, &EditOptions::default(), RecordingRenderer::new(), MemoryClipboard::new())
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn press<C: ClipboardBridge>(session: &mut Session<RecordingRenderer, C>, code: KeyCode, modifiers: KeyModifiers) {
        session.handle_key(key(code, modifiers), Instant::now()).unwrap();
    }

    fn ctrl<C: ClipboardBridge>(session: &mut Session<RecordingRenderer, C>, c: char) {
        press(session, KeyCode::Char(c), KeyModifiers::CONTROL);
    }

    fn type_text<C: ClipboardBridge>(session: &mut Session<RecordingRenderer, C>, text: &str) {
        for c in text.chars() {
            press(session, KeyCode::Char(c), KeyModifiers::NONE);
        }
    }

    #[test]
    fn test_each_key_issues_exactly_one_draw() {
        let mut session = session("ab\ncd");
        let keys = [
            (KeyCode::Right, KeyModifiers::NONE),
            (KeyCode::Right, KeyModifiers::SHIFT),
            (KeyCode::Char('x'), KeyModifiers::NONE),
            (KeyCode::Backspace, KeyModifiers::NONE),
            (KeyCode::Down, KeyModifiers::NONE),
            (KeyCode::Char('a'), KeyModifiers::CONTROL),
        ];
        for (count, (code, modifiers)) in keys.into_iter().enumerate() {
            press(&mut session, code, modifiers);
            assert_eq!(session.renderer().draws(), count + 1);
        }
    }

    #[test]
    fn test_shift_selection_grows_then_shrinks() {
        let mut session = session("ab");
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(
            session.selection().region(),
            Some(Selection { tail: Position::new(0, 0), head: Position::new(0, 2) })
        );

        press(&mut session, KeyCode::Left, KeyModifiers::SHIFT);
        assert_eq!(
            session.selection().region(),
            Some(Selection { tail: Position::new(0, 0), head: Position::new(0, 1) })
        );
        assert_eq!(session.document().get_text(), "ab");
    }

    #[test]
    fn test_plain_navigation_clears_selection() {
        let mut session = session("hello\nworld");
        ctrl(&mut session, 'a');
        assert!(session.selection().is_active());

        press(&mut session, KeyCode::Left, KeyModifiers::NONE);
        assert!(!session.selection().is_active());
        assert_eq!(session.document().get_text(), "hello\nworld");
        assert_eq!(session.renderer().calls.last(), Some(&Call::Draw { delta_only: true }));

        press(&mut session, KeyCode::Left, KeyModifiers::NONE);
        assert_eq!(session.renderer().calls.last(), Some(&Call::DrawCursor));
    }

    #[test]
    fn test_backspace_deletes_active_selection() {
        let mut session = session("ab");
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        press(&mut session, KeyCode::Backspace, KeyModifiers::NONE);

        assert_eq!(session.document().get_text(), "");
        assert_eq!(session.document().cursor(), Position::new(0, 0));
        assert!(!session.selection().is_active());
    }

    #[test]
    fn test_typing_replaces_selection() {
        let mut session = session("hello world");
        press(&mut session, KeyCode::End, KeyModifiers::SHIFT);
        type_text(&mut session, "bye");
        assert_eq!(session.document().get_text(), "bye");
        press(&mut session, KeyCode::Enter, KeyModifiers::NONE);
        press(&mut session, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(session.document().get_text(), "bye\n\t");
    }

    #[test]
    fn test_copy_requires_selection() {
        let mut session = session("abc");
        ctrl(&mut session, 'c');
        assert_eq!(session.clipboard().contents(), None);

        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        ctrl(&mut session, 'c');
        assert_eq!(session.clipboard().contents(), Some("ab"));
        assert!(session.selection().is_active());
        assert_eq!(session.document().get_text(), "abc");
    }

    #[test]
    fn test_cut_and_paste_across_lines() {
        let mut session = session("one\ntwo");
        press(&mut session, KeyCode::End, KeyModifiers::SHIFT);
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        ctrl(&mut session, 'x');
        assert_eq!(session.clipboard().contents(), Some("one\n"));
        assert_eq!(session.document().get_text(), "two");

        ctrl(&mut session, 'v');
        assert_eq!(session.document().get_text(), "one\ntwo");
        assert_eq!(session.document().cursor(), Position::new(1, 0));

        press(&mut session, KeyCode::End, KeyModifiers::CONTROL);
        ctrl(&mut session, 'v');
        assert_eq!(session.document().get_text(), "one\ntwoone\n");
        assert_eq!(session.document().cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_paste_line_break_replaces_selection() {
        let mut session = session("ab\ncd");
        press(&mut session, KeyCode::End, KeyModifiers::NONE);
        press(&mut session, KeyCode::Right, KeyModifiers::SHIFT);
        ctrl(&mut session, 'c');
        assert_eq!(session.clipboard().contents(), Some("\n"));

        ctrl(&mut session, 'v');
        assert_eq!(session.document().get_text(), "ab\ncd");
        assert_eq!(session.document().cursor(), Position::new(1, 0));
        assert!(!session.selection().is_active());
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn test_paste_replaces_selection() {
        let mut session = session("keep drop");
        ctrl(&mut session, 'a');
        ctrl(&mut session, 'c');
        press(&mut session, KeyCode::Home, KeyModifiers::CONTROL);
        press(&mut session, KeyCode::End, KeyModifiers::SHIFT);
        ctrl(&mut session, 'v');
        assert_eq!(session.document().get_text(), "keep drop");
        assert!(!session.selection().is_active());
    }

    #[test]
    fn test_paste_failure_leaves_document_unchanged() {
        let mut session = Session::new("abc", &EditOptions::default(), RecordingRenderer::new(), FailingClipboard);
        press(&mut session, KeyCode::Right, KeyModifiers::NONE);
        ctrl(&mut session, 'v');

        assert_eq!(session.document().get_text(), "abc");
        assert_eq!(session.document().cursor(), Position::new(0, 1));
        let (message, inverted) = session.renderer().last_status().unwrap();
        assert!(message.contains("no display"));
        assert!(inverted);
        assert!(session.is_input_enabled());
        assert_eq!(session.resolution(), None);

        type_text(&mut session, "z");
        assert_eq!(session.document().get_text(), "azbc");
    }

    #[test]
    fn test_failed_cut_keeps_selection_and_text() {
        let mut session = Session::new("abc", &EditOptions::default(), RecordingRenderer::new(), FailingClipboard);
        ctrl(&mut session, 'a');
        ctrl(&mut session, 'x');
        assert_eq!(session.document().get_text(), "abc");
        assert!(session.selection().is_active());
    }

    #[test]
    fn test_clipboard_write_failure_is_reported_and_session_continues() {
        let now = Instant::now();
        let mut session = Session::new("abc", &EditOptions::default(), RecordingRenderer::new(), FailingClipboard);
        session.dispatch(KeyAction::SelectAll, now).unwrap();

        for action in [KeyAction::Copy, KeyAction::Cut] {
            session.dispatch(action, now).unwrap();
            assert_eq!(
                session.renderer().last_status(),
                Some(("Error: clipboard unavailable: no display".to_string(), true))
            );
            assert_eq!(session.next_deadline(), Some(now + Duration::from_secs(4)));
            assert_eq!(session.renderer().calls.last(), Some(&Call::Draw { delta_only: true }));
            assert_eq!(session.document().get_text(), "abc");
            assert!(session.selection().is_active());
            assert!(session.is_input_enabled());
            assert_eq!(session.resolution(), None);
        }

        type_text(&mut session, "z");
        assert_eq!(session.document().get_text(), "z");
    }

    #[test]
    fn test_status_message_dismisses_after_timeout() {
        let now = Instant::now();
        let mut session = session("");
        session.dispatch(KeyAction::Paste, now).unwrap();
        assert_eq!(session.renderer().last_status(), Some(("Error: nothing to paste".to_string(), true)));
        assert_eq!(session.next_deadline(), Some(now + Duration::from_secs(4)));

        session.fire_due_timers(now + Duration::from_secs(3)).unwrap();
        assert!(session.renderer().last_status().unwrap().1);

        session.fire_due_timers(now + Duration::from_secs(4)).unwrap();
        assert_eq!(session.renderer().last_status(), Some((DEFAULT_STATUS.to_string(), false)));
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn test_new_status_message_replaces_timer() {
        let now = Instant::now();
        let mut session = session("");
        session.show_status("first", now).unwrap();
        session.show_status("second", now + Duration::from_secs(2)).unwrap();
        assert_eq!(session.next_deadline(), Some(now + Duration::from_secs(6)));

        session.fire_due_timers(now + Duration::from_secs(5)).unwrap();
        assert_eq!(session.renderer().last_status(), Some(("second".to_string(), true)));
    }

    #[test]
    fn test_resize_burst_redraws_once_with_last_size() {
        let now = Instant::now();
        let mut session = session("text");
        session.handle_event(InputEvent::Resize(80, 24), now).unwrap();
        session.handle_event(InputEvent::Resize(100, 30), now + Duration::from_millis(50)).unwrap();
        session.handle_event(InputEvent::Resize(120, 40), now + Duration::from_millis(100)).unwrap();

        session.fire_due_timers(now + Duration::from_millis(200)).unwrap();
        assert!(session.renderer().calls.is_empty());

        session.fire_due_timers(now + Duration::from_millis(250)).unwrap();
        let calls = &session.renderer().calls;
        let resizes: Vec<_> = calls.iter().filter(|c| matches!(c, Call::Resize(..))).collect();
        assert_eq!(resizes, vec![&Call::Resize(120, 40)]);
        assert_eq!(session.renderer().draws(), 1);
        assert_eq!(calls.last(), Some(&Call::Draw { delta_only: false }));
        assert!(calls.contains(&Call::Bar(BarPosition::Title, DEFAULT_TITLE.to_string(), false)));
    }

    #[test]
    fn test_page_down_uses_viewport_height() {
        let text = (0..40).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut session = session(&text);
        press(&mut session, KeyCode::PageDown, KeyModifiers::NONE);
        assert_eq!(session.document().cursor(), Position::new(10, 0));
        press(&mut session, KeyCode::PageUp, KeyModifiers::NONE);
        assert_eq!(session.document().cursor(), Position::new(0, 0));
    }

    #[test]
    fn test_exit_resolves_once_and_disables_input() {
        let now = Instant::now();
        let mut session = session("draft");
        session.show_status("pending", now).unwrap();
        session.handle_resize(10, 10, now);
        press(&mut session, KeyCode::End, KeyModifiers::NONE);
        type_text(&mut session, "!");
        ctrl(&mut session, 'd');

        assert_eq!(session.resolution(), Some("draft!"));
        assert!(!session.is_input_enabled());
        assert_eq!(session.next_deadline(), None);
        assert_eq!(session.renderer().calls.last(), Some(&Call::Teardown));

        let draws = session.renderer().draws();
        type_text(&mut session, "ignored");
        session.handle_resize(50, 50, now);
        assert_eq!(session.renderer().draws(), draws);
        assert_eq!(session.document().get_text(), "draft!");
        assert_eq!(session.next_deadline(), None);
    }

    #[test]
    fn test_failing_exit_hook_keeps_session_open() {
        let mut session = session("text");
        session.add_exit_hook(Box::new(|_: &str| -> Result<(), ActionError> {
            Err(ActionError::Hook("save failed".to_string()))
        }));
        ctrl(&mut session, 'q');

        assert_eq!(session.resolution(), None);
        assert!(session.is_input_enabled());
        assert_eq!(session.renderer().last_status(), Some(("Error: save failed".to_string(), true)));
        assert!(!session.renderer().calls.contains(&Call::Teardown));
    }

    #[test]
    fn test_exit_hook_sees_final_text() {
        let mut session = session("a");
        session.add_exit_hook(Box::new(|text: &str| -> Result<(), ActionError> {
            assert_eq!(text, "ab");
            Ok(())
        }));
        press(&mut session, KeyCode::End, KeyModifiers::NONE);
        type_text(&mut session, "b");
        ctrl(&mut session, 'd');
        assert_eq!(session.resolution(), Some("ab"));
    }

    #[test]
    fn test_run_returns_final_text() {
        let mut events = ScriptedEvents(VecDeque::from(vec![
            InputEvent::Key(key(KeyCode::End, KeyModifiers::NONE)),
            InputEvent::Key(key(KeyCode::Char('!'), KeyModifiers::NONE)),
            InputEvent::Resize(90, 30),
            InputEvent::Key(key(KeyCode::Char('d'), KeyModifiers::CONTROL)),
        ]));

        let text = session("hi").run(&mut events).unwrap();
        assert_eq!(text, "hi!");
    }

    #[test]
    fn test_run_fails_on_renderer_error() {
        let mut renderer = RecordingRenderer::new();
        renderer.fail_draw = true;
        let session = Session::new("hi", &EditOptions::default(), renderer, MemoryClipboard::new());
        let mut events = ScriptedEvents(VecDeque::new());

        let err = session.run(&mut events).unwrap_err();
        assert!(matches!(err, EditorError::Render(_)));
    }

    #[test]
    fn test_run_fails_when_input_ends() {
        let mut events = ScriptedEvents(VecDeque::new());
        let err = session("hi").run(&mut events).unwrap_err();
        assert!(matches!(err, EditorError::Input(_)));
    }

    #[test]
    fn test_title_and_tab_settings_come_from_options() {
        let mut options = EditOptions::default();
        options.config.expand_tab = true;
        options.config.tab_stop = 2;
        options.config.title = Some("from config".to_string());
        let mut session = Session::new("", &options, RecordingRenderer::new(), MemoryClipboard::new());
        session.start().unwrap();
        assert!(
            session
                .renderer()
                .calls
                .contains(&Call::Bar(BarPosition::Title, "from config".to_string(), false))
        );

        press(&mut session, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(session.document().get_text(), "  ");

        options.title = Some("explicit".to_string());
        let mut session = Session::new("", &options, RecordingRenderer::new(), MemoryClipboard::new());
        session.start().unwrap();
        assert!(
            session
                .renderer()
                .calls
                .contains(&Call::Bar(BarPosition::Title, "explicit".to_string(), false))
        );
    }
}
