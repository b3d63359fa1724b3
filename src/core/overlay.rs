//! Console overlay state machine.
//!
//! Tracks visibility, edit focus, the edit line, history navigation and the
//! log view. Renderers drive it through [`ConsoleInput`]s and read it back to
//! draw; no rendering happens here.

use bevy::prelude::*;

use super::{
    is_blank, CommandHistory, CommandQueue, EditBuffer, LogView, DEFAULT_DELIMITERS,
    DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_COMMAND_LEN,
};

/// Observable overlay state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleState {
    /// Not shown.
    #[default]
    Hidden,
    /// Shown, edit line not focused.
    Visible,
    /// Shown with keyboard focus in the edit line.
    EditFocused,
}

/// Key-level input understood by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleInput {
    /// Show or hide the console.
    Toggle,
    /// The edit line gained keyboard focus.
    Focus,
    /// The edit line lost keyboard focus.
    Blur,
    /// Recall the previous history entry.
    HistoryUp,
    /// Recall the next history entry.
    HistoryDown,
    /// Submit the edit line.
    Submit,
}

/// The developer console overlay.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{CommandQueue, ConsoleInput, ConsoleOverlay, ConsoleState};
///
/// let queue = CommandQueue::new();
/// let mut overlay = ConsoleOverlay::default();
///
/// overlay.handle(ConsoleInput::Toggle, &queue);
/// overlay.handle(ConsoleInput::Focus, &queue);
/// assert_eq!(overlay.state(), ConsoleState::EditFocused);
///
/// overlay.edit_mut().set("echo hi");
/// assert_eq!(overlay.handle(ConsoleInput::Submit, &queue), Some("echo hi".to_string()));
/// assert_eq!(queue.take_pending(), vec!["echo hi".to_string()]);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct ConsoleOverlay {
    visible: bool,
    edit_active: bool,
    edit: EditBuffer,
    history: CommandHistory,
    view: LogView,
    delimiters: Vec<char>,
}

impl Default for ConsoleOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_COMMAND_LEN)
    }
}

impl ConsoleOverlay {
    /// Create a hidden overlay with the given history and edit line limits.
    pub fn new(history_capacity: usize, max_command_len: usize) -> Self {
        Self {
            visible: false,
            edit_active: false,
            edit: EditBuffer::new(max_command_len),
            history: CommandHistory::new(history_capacity),
            view: LogView::new(),
            delimiters: DEFAULT_DELIMITERS.to_vec(),
        }
    }

    /// Use `delimiters` to decide whether a submitted line is blank.
    ///
    /// Should match the registry's delimiters.
    pub fn with_delimiters(mut self, delimiters: impl Into<Vec<char>>) -> Self {
        self.delimiters = delimiters.into();
        self
    }

    /// Current state, derived from visibility and focus.
    pub fn state(&self) -> ConsoleState {
        match (self.visible, self.edit_active) {
            (false, _) => ConsoleState::Hidden,
            (true, false) => ConsoleState::Visible,
            (true, true) => ConsoleState::EditFocused,
        }
    }

    /// Whether the console is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the edit line has keyboard focus.
    #[inline]
    pub fn is_edit_active(&self) -> bool {
        self.edit_active
    }

    /// Show or hide. Showing starts unfocused; hiding always drops focus.
    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        self.edit_active = false;
    }

    /// Show or hide explicitly. Returns whether visibility changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.toggle();
        true
    }

    /// Give the edit line keyboard focus. Ignored while hidden.
    pub fn focus(&mut self) {
        if self.visible {
            self.edit_active = true;
        }
    }

    /// Take focus away from the edit line.
    pub fn blur(&mut self) {
        self.edit_active = false;
    }

    /// Show the previous history entry in the edit line.
    ///
    /// Only while focused. Returns whether the edit line changed.
    pub fn history_up(&mut self) -> bool {
        if !self.edit_active {
            return false;
        }
        match self.history.navigate_up(self.edit.as_str()) {
            Some(line) => {
                let line = line.to_string();
                self.edit.set(&line);
                true
            }
            None => false,
        }
    }

    /// Show the next history entry, or the saved draft past the newest.
    ///
    /// Only while focused. Returns whether the edit line changed.
    pub fn history_down(&mut self) -> bool {
        if !self.edit_active {
            return false;
        }
        match self.history.navigate_down() {
            Some(line) => {
                self.edit.set(&line);
                true
            }
            None => false,
        }
    }

    /// Submit the edit line.
    ///
    /// Does nothing on an empty buffer. A blank buffer is cleared but not
    /// queued. Otherwise the line is queued, recorded in history and returned.
    pub fn commit(&mut self, queue: &CommandQueue) -> Option<String> {
        if self.edit.is_empty() {
            return None;
        }

        let line = self.edit.take();
        self.history.reset_cursor();
        if is_blank(&line, &self.delimiters) {
            return None;
        }

        self.history.commit(&line);
        queue.push(line.clone());
        Some(line)
    }

    /// Apply one input. Returns the submitted line, if any.
    ///
    /// History keys and submit act only while the edit line is focused.
    pub fn handle(&mut self, input: ConsoleInput, queue: &CommandQueue) -> Option<String> {
        match input {
            ConsoleInput::Toggle => self.toggle(),
            ConsoleInput::Focus => self.focus(),
            ConsoleInput::Blur => self.blur(),
            ConsoleInput::HistoryUp => {
                self.history_up();
            }
            ConsoleInput::HistoryDown => {
                self.history_down();
            }
            ConsoleInput::Submit if self.edit_active => return self.commit(queue),
            ConsoleInput::Submit => {}
        }
        None
    }

    /// The edit line.
    #[inline]
    pub fn edit(&self) -> &EditBuffer {
        &self.edit
    }

    /// Mutable access to the edit line, for renderers.
    #[inline]
    pub fn edit_mut(&mut self) -> &mut EditBuffer {
        &mut self.edit
    }

    /// Submitted lines.
    #[inline]
    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    /// Mutable access to the history.
    #[inline]
    pub fn history_mut(&mut self) -> &mut CommandHistory {
        &mut self.history
    }

    /// Log view layout and scroll state.
    #[inline]
    pub fn view(&self) -> &LogView {
        &self.view
    }

    /// Mutable access to the log view.
    #[inline]
    pub fn view_mut(&mut self) -> &mut LogView {
        &mut self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused() -> (ConsoleOverlay, CommandQueue) {
        let mut overlay = ConsoleOverlay::default();
        overlay.toggle();
        overlay.focus();
        (overlay, CommandQueue::new())
    }

    fn submit(overlay: &mut ConsoleOverlay, queue: &CommandQueue, line: &str) -> Option<String> {
        overlay.edit_mut().set(line);
        overlay.handle(ConsoleInput::Submit, queue)
    }

    #[test]
    fn test_toggle_cycle() {
        let mut overlay = ConsoleOverlay::default();
        assert_eq!(overlay.state(), ConsoleState::Hidden);

        overlay.toggle();
        assert_eq!(overlay.state(), ConsoleState::Visible);

        overlay.focus();
        assert_eq!(overlay.state(), ConsoleState::EditFocused);

        overlay.toggle();
        assert_eq!(overlay.state(), ConsoleState::Hidden);
        assert!(!overlay.is_edit_active());

        // Shows unfocused again
        overlay.toggle();
        assert_eq!(overlay.state(), ConsoleState::Visible);
    }

    #[test]
    fn test_focus_ignored_while_hidden() {
        let mut overlay = ConsoleOverlay::default();
        overlay.focus();
        assert_eq!(overlay.state(), ConsoleState::Hidden);
        assert!(!overlay.is_edit_active());
    }

    #[test]
    fn test_blur_returns_to_visible() {
        let (mut overlay, queue) = focused();
        overlay.handle(ConsoleInput::Blur, &queue);
        assert_eq!(overlay.state(), ConsoleState::Visible);
    }

    #[test]
    fn test_submit_pushes_and_records() {
        let (mut overlay, queue) = focused();
        assert_eq!(submit(&mut overlay, &queue, "add 2 3"), Some("add 2 3".into()));
        assert_eq!(queue.take_pending(), vec!["add 2 3".to_string()]);
        assert_eq!(overlay.history().iter().collect::<Vec<_>>(), vec!["add 2 3"]);
        assert!(overlay.edit().is_empty());
    }

    #[test]
    fn test_blank_submit_cleared_not_queued() {
        let (mut overlay, queue) = focused();
        assert_eq!(submit(&mut overlay, &queue, "   "), None);
        assert!(queue.is_empty());
        assert!(overlay.history().is_empty());
        assert!(overlay.edit().is_empty());
    }

    #[test]
    fn test_blank_check_uses_configured_delimiters() {
        let queue = CommandQueue::new();
        let mut overlay = ConsoleOverlay::default().with_delimiters([' ', ',']);
        overlay.toggle();
        overlay.focus();

        assert_eq!(submit(&mut overlay, &queue, " , ,"), None);
        assert!(queue.is_empty());
        assert!(overlay.edit().is_empty());

        // A tab is not a delimiter here, so the line is queued
        assert_eq!(submit(&mut overlay, &queue, "\t"), Some("\t".into()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let (mut overlay, queue) = focused();
        assert_eq!(overlay.handle(ConsoleInput::Submit, &queue), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_submit_requires_focus() {
        let (mut overlay, queue) = focused();
        overlay.blur();
        assert_eq!(submit(&mut overlay, &queue, "echo"), None);
        assert!(queue.is_empty());
        assert_eq!(overlay.edit().as_str(), "echo");
    }

    #[test]
    fn test_history_scenario() {
        let (mut overlay, queue) = focused();
        for line in ["a", "b", "c"] {
            submit(&mut overlay, &queue, line);
        }

        overlay.edit_mut().set("d");
        overlay.handle(ConsoleInput::HistoryUp, &queue);
        assert_eq!(overlay.edit().as_str(), "c");
        overlay.handle(ConsoleInput::HistoryUp, &queue);
        assert_eq!(overlay.edit().as_str(), "b");
        overlay.handle(ConsoleInput::HistoryDown, &queue);
        assert_eq!(overlay.edit().as_str(), "c");
        overlay.handle(ConsoleInput::HistoryDown, &queue);
        assert_eq!(overlay.edit().as_str(), "d");
    }

    #[test]
    fn test_history_keys_ignored_unfocused() {
        let (mut overlay, queue) = focused();
        submit(&mut overlay, &queue, "a");
        overlay.blur();
        overlay.edit_mut().set("d");
        assert!(!overlay.history_up());
        assert_eq!(overlay.edit().as_str(), "d");
    }

    #[test]
    fn test_duplicate_submit_recorded_once() {
        let (mut overlay, queue) = focused();
        submit(&mut overlay, &queue, "x");
        submit(&mut overlay, &queue, "x");
        submit(&mut overlay, &queue, "y");
        assert_eq!(queue.len(), 3);
        assert_eq!(overlay.history().iter().collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
