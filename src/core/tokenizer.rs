//! Whitespace tokenizer for console command lines.
//!
//! Splits a line on runs of delimiter characters. There is no quoting or
//! escaping: a delimiter can never appear inside a single argument. Commands
//! that need free text take it through an optional trailing text parameter,
//! which receives the rest of the line verbatim.

use std::iter::FusedIterator;

/// Delimiters used when none are configured.
pub const DEFAULT_DELIMITERS: &[char] = &[' ', '\t'];

/// A contiguous span of non-delimiter characters borrowed from a line.
///
/// The lifetime ties the token to the line it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgToken<'a> {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    text: &'a str,
}

impl<'a> ArgToken<'a> {
    /// The token text.
    #[inline]
    pub fn as_str(&self) -> &'a str {
        self.text
    }
}

impl AsRef<str> for ArgToken<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

impl PartialEq<&str> for ArgToken<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

/// Lazy, forward-only sequence of tokens over a line.
///
/// Created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    line: &'a str,
    delimiters: &'a [char],
    pos: usize,
}

impl<'a> Tokens<'a> {
    /// The line being tokenized.
    #[inline]
    pub fn line(&self) -> &'a str {
        self.line
    }

    /// The unconsumed remainder of the line, with leading delimiters skipped.
    pub fn remainder(&self) -> &'a str {
        self.line
            .get(self.pos..)
            .unwrap_or("")
            .trim_start_matches(self.delimiters)
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = ArgToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.line.get(self.pos..)?;
        let skipped = rest.len() - rest.trim_start_matches(self.delimiters).len();
        let start = self.pos + skipped;
        let rest = self.line.get(start..)?;

        if rest.is_empty() {
            self.pos = self.line.len();
            return None;
        }

        let len = rest.find(self.delimiters).unwrap_or(rest.len());
        let end = start + len;
        self.pos = end;

        Some(ArgToken {
            start,
            end,
            text: &self.line[start..end],
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.line.len().saturating_sub(self.pos);
        (0, Some(remaining.div_ceil(2)))
    }
}

impl FusedIterator for Tokens<'_> {}

/// Tokenize `line`, splitting on any run of `delimiters`.
///
/// Empty segments are skipped, so leading, trailing and repeated delimiters
/// never produce empty tokens.
///
/// # Examples
///
/// ```
/// use bevy_devconsole::core::{tokenize, DEFAULT_DELIMITERS};
///
/// let tokens: Vec<_> = tokenize("a  b\tc", DEFAULT_DELIMITERS)
///     .map(|t| t.as_str())
///     .collect();
/// assert_eq!(tokens, vec!["a", "b", "c"]);
/// ```
pub fn tokenize<'a>(line: &'a str, delimiters: &'a [char]) -> Tokens<'a> {
    Tokens {
        line,
        delimiters,
        pos: 0,
    }
}

/// Whether `line` contains nothing but delimiters (or nothing at all).
pub fn is_blank(line: &str, delimiters: &[char]) -> bool {
    line.trim_matches(delimiters).trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str) -> Vec<&str> {
        tokenize(line, DEFAULT_DELIMITERS).map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_tokenize_collapses_runs() {
        assert_eq!(words("a  b\tc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(words("echo hello world"), vec!["echo", "hello", "world"]);
    }

    #[test]
    fn test_tokenize_leading_trailing() {
        assert_eq!(words("  \t echo   hello  \t"), vec!["echo", "hello"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(words("").is_empty());
        assert!(words(" \t  ").is_empty());
    }

    #[test]
    fn test_tokenize_no_quoting() {
        // Quotes are ordinary characters.
        assert_eq!(words(r#"say "hello world""#), vec!["say", "\"hello", "world\""]);
    }

    #[test]
    fn test_token_spans() {
        let line = "add  2 3";
        let tokens: Vec<_> = tokenize(line, DEFAULT_DELIMITERS).collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[1].start, tokens[1].end), (5, 6));
        assert_eq!(&line[tokens[2].start..tokens[2].end], "3");
    }

    #[test]
    fn test_tokenize_custom_delimiters() {
        let tokens: Vec<_> = tokenize("a,b;;c", &[',', ';'])
            .map(|t| t.as_str())
            .collect();
        assert_eq!(tokens, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tokenize_unicode() {
        assert_eq!(words("say héllo wörld"), vec!["say", "héllo", "wörld"]);
    }

    #[test]
    fn test_remainder() {
        let mut tokens = tokenize("say  hello   there ", DEFAULT_DELIMITERS);
        tokens.next();
        assert_eq!(tokens.remainder(), "hello   there ");
    }

    #[test]
    fn test_exhausted_stays_exhausted() {
        let mut tokens = tokenize("x", DEFAULT_DELIMITERS);
        assert_eq!(tokens.next().map(|t| t.as_str()), Some("x"));
        assert!(tokens.next().is_none());
        assert!(tokens.next().is_none());
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank("   \t ", DEFAULT_DELIMITERS));
        assert!(is_blank("", DEFAULT_DELIMITERS));
        assert!(is_blank(" \n ", DEFAULT_DELIMITERS));
        assert!(!is_blank("  x ", DEFAULT_DELIMITERS));
    }
}
