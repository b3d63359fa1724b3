//! Log view layout and scroll-follow.
//!
//! Pure layout decisions, kept apart from any renderer so they can be tested
//! without a window.

/// Rows reserved below the log for the input line and its separator.
pub const INPUT_ROWS: usize = 2;

/// How many screens of history the flowing view keeps.
pub const FLOW_SCREENS: usize = 4;

/// How the log should be laid out this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLayout {
    /// Everything fits: pad with `blank_rows` empty rows so the `lines`
    /// entries sit at the bottom, directly above the input row.
    Pinned { blank_rows: usize, lines: usize },
    /// Too many lines to pin: show the most recent `lines` entries top to
    /// bottom inside a scroll area.
    Flow { lines: usize },
}

impl ViewLayout {
    /// Number of log entries to render.
    pub fn lines(&self) -> usize {
        match *self {
            ViewLayout::Pinned { lines, .. } | ViewLayout::Flow { lines } => lines,
        }
    }
}

/// Scroll state of the log view.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{LogView, ViewLayout};
///
/// let mut view = LogView::default();
/// assert_eq!(view.layout(3, 10), ViewLayout::Pinned { blank_rows: 5, lines: 3 });
/// assert!(view.observe(3));
/// assert!(!view.observe(3));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogView {
    last_total: u64,
}

impl LogView {
    /// A view that has not observed any output yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide the layout for `total` buffered lines in a view that fits
    /// `visible_rows` rows.
    pub fn layout(&self, total: usize, visible_rows: usize) -> ViewLayout {
        if total + INPUT_ROWS < visible_rows {
            ViewLayout::Pinned {
                blank_rows: visible_rows - total - INPUT_ROWS,
                lines: total,
            }
        } else {
            ViewLayout::Flow {
                lines: total.min(FLOW_SCREENS * visible_rows),
            }
        }
    }

    /// Record the running total of logged lines.
    ///
    /// Returns `true` when the view must jump to the end: any growth since
    /// the previous call snaps to the bottom, wherever the user had scrolled.
    /// Pass [`LogBuffer::total_logged`](super::LogBuffer::total_logged) so
    /// growth is seen even once the ring is full.
    pub fn observe(&mut self, total: u64) -> bool {
        let grew = total > self.last_total;
        self.last_total = total;
        grew
    }

    /// The total seen by the last [`Self::observe`].
    #[inline]
    pub fn last_total(&self) -> u64 {
        self.last_total
    }
}
