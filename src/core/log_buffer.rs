//! Thread-safe ring buffer of console log lines.
//!
//! Any thread may log; the console renderer reads consistent snapshots.
//! Every mutation and every snapshot goes through one lock.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;

use bevy::prelude::*;

use super::RingBuffer;

/// Default number of retained log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Classification of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Severity {
    /// Informational output.
    #[default]
    Info,
    /// Something looks wrong but processing continued.
    Warn,
    /// An operation failed.
    Error,
}

impl Severity {
    /// Short tag used when rendering a line.
    pub fn tag(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<bevy::log::Level> for Severity {
    fn from(level: bevy::log::Level) -> Self {
        use bevy::log::Level;
        match level {
            Level::ERROR => Severity::Error,
            Level::WARN => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

/// One line of console output.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// When the entry was first logged.
    pub timestamp: SystemTime,
    /// Entry classification.
    pub severity: Severity,
    /// The message text.
    pub message: String,
    /// How many times this exact message was logged in a row.
    pub repeats: u32,
    /// Position in the log's lifetime, bumped again when a repeat collapses
    /// into this entry. Zero until the entry is logged.
    pub seq: u64,
}

impl LogEntry {
    /// Create an entry stamped with the current time.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: SystemTime::now(),
            severity,
            message: message.into(),
            repeats: 1,
            seq: 0,
        }
    }

    /// Render as `HH:MM:SS (N times) [level]: message`.
    ///
    /// The repeat annotation only appears for collapsed repeats.
    pub fn render(&self) -> String {
        let mut line = format_time(self.timestamp);
        line.push(' ');
        if self.repeats > 1 {
            line.push_str(&format!("({} times) ", self.repeats));
        }
        line.push_str(&format!("[{}]: {}", self.severity, self.message));
        line
    }
}

/// Format a SystemTime as an `HH:MM:SS` string (UTC).
pub fn format_time(t: SystemTime) -> String {
    let duration = t.duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = duration.as_secs();
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[derive(Debug)]
struct LogRing {
    entries: RingBuffer<LogEntry>,
    total: u64,
}

/// Shared handle to the console log.
///
/// Cloning the handle shares the underlying buffer, so the same log can be
/// written from a tracing layer, a terminal thread and command handlers.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{LogBuffer, Severity};
///
/// let log = LogBuffer::new(2);
/// log.log(Severity::Info, "one");
/// log.log(Severity::Warn, "two");
/// log.log(Severity::Error, "three");
///
/// let lines: Vec<_> = log.snapshot(10).into_iter().map(|e| e.message).collect();
/// assert_eq!(lines, vec!["two", "three"]);
/// ```
#[derive(Resource, Debug, Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<LogRing>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl LogBuffer {
    /// Create a buffer retaining the last `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogRing {
                entries: RingBuffer::new(capacity),
                total: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogRing> {
        // A panicking writer cannot leave the ring half-updated, so recover.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a message.
    ///
    /// A message identical to the newest entry (same severity and text)
    /// bumps that entry's repeat count instead of adding a line.
    pub fn log(&self, severity: Severity, message: impl Into<String>) {
        let message = message.into();
        let mut ring = self.lock();
        ring.total += 1;

        let seq = ring.total;

        if let Some(last) = ring.entries.newest_mut() {
            if last.severity == severity && last.message == message {
                last.repeats = last.repeats.saturating_add(1);
                last.seq = seq;
                return;
            }
        }

        let mut entry = LogEntry::new(severity, message);
        entry.seq = seq;
        ring.entries.push(entry);
    }

    /// Log at [`Severity::Info`].
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    /// Log at [`Severity::Warn`].
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    /// Log at [`Severity::Error`].
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Copy of the most recent `count` entries, oldest first.
    pub fn snapshot(&self, count: usize) -> Vec<LogEntry> {
        self.lock().entries.recent(count).cloned().collect()
    }

    /// Copy of every retained entry, oldest first.
    pub fn snapshot_all(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().cloned().collect()
    }

    /// Copy of the entries added or updated after `seq`, oldest first.
    ///
    /// Pass the `seq` of the last entry already seen (or 0 to start). A
    /// collapsed repeat comes back once more with its new count.
    ///
    /// ```
    /// use bevy_devconsole::core::LogBuffer;
    ///
    /// let log = LogBuffer::new(10);
    /// log.info("x");
    /// let seen = log.since(0).last().map(|e| e.seq).unwrap_or_default();
    ///
    /// log.info("y");
    /// log.info("y");
    /// let fresh = log.since(seen);
    /// assert_eq!(fresh.len(), 1);
    /// assert_eq!((fresh[0].message.as_str(), fresh[0].repeats), ("y", 2));
    /// ```
    pub fn since(&self, seq: u64) -> Vec<LogEntry> {
        let ring = self.lock();
        // Sequence numbers grow from oldest to newest
        let fresh = ring.entries.iter().rev().take_while(|e| e.seq > seq).count();
        ring.entries.recent(fresh).cloned().collect()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if no entries are retained.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Maximum number of retained entries.
    pub fn capacity(&self) -> usize {
        self.lock().entries.capacity()
    }

    /// Resize the ring, dropping the oldest entries if it shrinks.
    pub fn set_capacity(&self, capacity: usize) {
        self.lock().entries.set_capacity(capacity);
    }

    /// Number of messages ever logged, including collapsed repeats.
    ///
    /// Keeps growing after the ring is full, so readers can detect new output.
    pub fn total_logged(&self) -> u64 {
        self.lock().total
    }

    /// Remove all retained entries.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }
}
