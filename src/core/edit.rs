//! Bounded edit line.

/// Default maximum length of the edit line, in chars.
pub const DEFAULT_MAX_COMMAND_LEN: usize = 512;

/// A growable `String` that never holds more than `max_chars` chars.
///
/// Input past the limit is truncated on a char boundary.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::EditBuffer;
///
/// let mut edit = EditBuffer::new(5);
/// edit.push_str("hello world");
/// assert_eq!(edit.as_str(), "hello");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditBuffer {
    text: String,
    max_chars: usize,
}

impl Default for EditBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_COMMAND_LEN)
    }
}

impl EditBuffer {
    /// Create an empty buffer.
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
        }
    }

    /// Replace the content.
    pub fn set(&mut self, text: &str) {
        self.text.clear();
        self.push_str(text);
    }

    /// Append text, dropping whatever does not fit.
    pub fn push_str(&mut self, text: &str) {
        let room = self.max_chars.saturating_sub(self.char_len());
        match text.char_indices().nth(room) {
            Some((cut, _)) => self.text.push_str(&text[..cut]),
            None => self.text.push_str(text),
        }
    }

    /// Append a single char if there is room. Returns whether it was added.
    pub fn push(&mut self, c: char) -> bool {
        if self.char_len() >= self.max_chars {
            return false;
        }
        self.text.push(c);
        true
    }

    /// Remove the last char.
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Empty the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Take the content, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Maximum length in chars.
    #[inline]
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Change the limit, truncating the current content if needed.
    pub fn set_max_chars(&mut self, max_chars: usize) {
        self.max_chars = max_chars;
        if let Some((cut, _)) = self.text.char_indices().nth(max_chars) {
            self.text.truncate(cut);
        }
    }

    /// Mutable access for text widgets. Call [`Self::enforce_limit`] afterwards.
    pub fn as_mut_string(&mut self) -> &mut String {
        &mut self.text
    }

    /// Truncate content that grew past the limit through [`Self::as_mut_string`].
    pub fn enforce_limit(&mut self) {
        self.set_max_chars(self.max_chars);
    }
}

impl AsRef<str> for EditBuffer {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_on_overflow() {
        let mut edit = EditBuffer::new(4);
        edit.push_str("ab");
        edit.push_str("cdef");
        assert_eq!(edit.as_str(), "abcd");
        assert!(!edit.push('x'));
    }

    #[test]
    fn test_multibyte_boundary() {
        let mut edit = EditBuffer::new(3);
        edit.set("héllo");
        assert_eq!(edit.as_str(), "hél");
        assert_eq!(edit.char_len(), 3);
        assert_eq!(edit.len(), 4);
    }

    #[test]
    fn test_set_replaces() {
        let mut edit = EditBuffer::default();
        edit.set("first");
        edit.set("second");
        assert_eq!(edit.as_str(), "second");
        assert_eq!(edit.take(), "second");
        assert!(edit.is_empty());
    }

    #[test]
    fn test_enforce_limit_after_widget_edit() {
        let mut edit = EditBuffer::new(3);
        edit.as_mut_string().push_str("abcdef");
        edit.enforce_limit();
        assert_eq!(edit.as_str(), "abc");
    }

    #[test]
    fn test_pop() {
        let mut edit = EditBuffer::new(8);
        edit.set("ab");
        assert_eq!(edit.pop(), Some('b'));
        assert_eq!(edit.as_str(), "a");
    }
}
