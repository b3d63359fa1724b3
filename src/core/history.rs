//! Command history with cursor navigation.

use super::RingBuffer;

/// Default number of remembered lines.
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;

/// Where the history cursor points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryCursor {
    /// Editing the live (uncommitted) line.
    #[default]
    Live,
    /// Browsing history; 0 is the newest entry.
    Back(usize),
}

/// Previously committed lines, oldest first.
///
/// Never holds two adjacent equal entries. While browsing, the live line is
/// kept as a draft and restored when the cursor returns to [`HistoryCursor::Live`].
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::CommandHistory;
///
/// let mut history = CommandHistory::new(16);
/// history.commit("x");
/// history.commit("x");
/// history.commit("y");
/// assert_eq!(history.iter().collect::<Vec<_>>(), vec!["x", "y"]);
///
/// assert_eq!(history.navigate_up("draft"), Some("y"));
/// assert_eq!(history.navigate_up("y"), Some("x"));
/// assert_eq!(history.navigate_down(), Some("y".to_string()));
/// assert_eq!(history.navigate_down(), Some("draft".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: RingBuffer<String>,
    cursor: HistoryCursor,
    draft: String,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl CommandHistory {
    /// Create an empty history holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RingBuffer::new(capacity),
            cursor: HistoryCursor::Live,
            draft: String::new(),
        }
    }

    /// Record a committed line.
    ///
    /// Blank lines and repeats of the newest entry are ignored. Returns
    /// whether the line was stored. An accepted line resets the cursor.
    pub fn commit(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            return false;
        }
        if self.entries.newest().is_some_and(|last| last == line) {
            return false;
        }
        self.entries.push(line.to_string());
        self.reset_cursor();
        true
    }

    /// Move toward older entries.
    ///
    /// Leaving the live line saves `current` as the draft. Clamped at the
    /// oldest entry. Returns the text to show, or `None` if history is empty.
    pub fn navigate_up(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }

        let back = match self.cursor {
            HistoryCursor::Live => {
                self.draft = current.to_string();
                0
            }
            HistoryCursor::Back(n) => (n + 1).min(self.entries.len() - 1),
        };
        self.cursor = HistoryCursor::Back(back);
        self.entry_back(back)
    }

    /// Move toward newer entries.
    ///
    /// Moving past the newest entry returns to the live line and yields the
    /// saved draft exactly. Does nothing (`None`) when already live.
    pub fn navigate_down(&mut self) -> Option<String> {
        match self.cursor {
            HistoryCursor::Live => None,
            HistoryCursor::Back(0) => {
                self.cursor = HistoryCursor::Live;
                Some(std::mem::take(&mut self.draft))
            }
            HistoryCursor::Back(n) => {
                let back = (n - 1).min(self.entries.len().saturating_sub(1));
                self.cursor = HistoryCursor::Back(back);
                self.entry_back(back).map(str::to_string)
            }
        }
    }

    fn entry_back(&self, back: usize) -> Option<&str> {
        let index = self.entries.len().checked_sub(back + 1)?;
        self.entries.get(index).map(String::as_str)
    }

    /// Return to the live line and forget the draft.
    pub fn reset_cursor(&mut self) {
        self.cursor = HistoryCursor::Live;
        self.draft.clear();
    }

    /// Current cursor position.
    #[inline]
    pub fn cursor(&self) -> HistoryCursor {
        self.cursor
    }

    /// Whether the user is browsing history.
    #[inline]
    pub fn is_browsing(&self) -> bool {
        self.cursor != HistoryCursor::Live
    }

    /// The saved draft (empty when live).
    #[inline]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of stored lines.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no lines are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of stored lines.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }

    /// Change the capacity, dropping the oldest lines on shrink.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.entries.set_capacity(capacity);
        self.reset_cursor();
    }

    /// Forget every stored line.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.reset_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(history: &CommandHistory) -> Vec<&str> {
        history.iter().collect()
    }

    #[test]
    fn test_adjacent_duplicates_suppressed() {
        let mut history = CommandHistory::new(8);
        assert!(history.commit("x"));
        assert!(!history.commit("x"));
        assert!(history.commit("y"));
        assert!(history.commit("x"));
        assert_eq!(lines(&history), vec!["x", "y", "x"]);
    }

    #[test]
    fn test_blank_never_stored() {
        let mut history = CommandHistory::new(8);
        assert!(!history.commit(""));
        assert!(!history.commit(" \t "));
        assert!(history.is_empty());
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut history = CommandHistory::new(2);
        history.commit("a");
        history.commit("b");
        history.commit("c");
        assert_eq!(lines(&history), vec!["b", "c"]);
    }

    #[test]
    fn test_up_clamps_at_oldest() {
        let mut history = CommandHistory::new(8);
        history.commit("a");
        history.commit("b");

        assert_eq!(history.navigate_up("d"), Some("b"));
        assert_eq!(history.navigate_up("b"), Some("a"));
        assert_eq!(history.navigate_up("a"), Some("a"));
        assert_eq!(history.navigate_up("a"), Some("a"));
        assert_eq!(history.cursor(), HistoryCursor::Back(1));
    }

    #[test]
    fn test_down_restores_draft_exactly() {
        let mut history = CommandHistory::new(8);
        history.commit("a");
        history.commit("b");

        for _ in 0..5 {
            history.navigate_up("  d  ");
        }
        assert_eq!(history.navigate_down(), Some("b".to_string()));
        assert_eq!(history.navigate_down(), Some("  d  ".to_string()));
        assert_eq!(history.cursor(), HistoryCursor::Live);
        assert_eq!(history.navigate_down(), None);
    }

    #[test]
    fn test_draft_saved_only_when_leaving_live() {
        let mut history = CommandHistory::new(8);
        history.commit("a");
        history.commit("b");

        history.navigate_up("draft");
        // The edit buffer now shows "b"; that must not overwrite the draft.
        history.navigate_up("b");
        assert_eq!(history.draft(), "draft");
    }

    #[test]
    fn test_empty_history_navigation() {
        let mut history = CommandHistory::new(8);
        assert_eq!(history.navigate_up("d"), None);
        assert!(!history.is_browsing());
        assert_eq!(history.navigate_down(), None);
    }

    #[test]
    fn test_commit_resets_cursor() {
        let mut history = CommandHistory::new(8);
        history.commit("a");
        history.navigate_up("d");
        assert!(history.is_browsing());

        history.commit("b");
        assert!(!history.is_browsing());
        assert_eq!(history.draft(), "");
    }
}
