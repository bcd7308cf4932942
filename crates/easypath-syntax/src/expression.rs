//! Immutable expression text and spans into it.

use crate::quote::QuoteMask;

/// Half-open `[start, end)` character range within an [`Expression`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TokenSpan {
    pub start: usize,
    pub end: usize,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} past end {end}");
        Self { start, end }
    }

    /// Empty span at `at`.
    pub fn empty(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// A character sequence that is never modified in place.
///
/// Indexing is by `char`, so offsets stay meaningful for non-ASCII literal
/// content. Every rewrite builds a new value with [`Expression::splice`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expression {
    chars: Vec<char>,
}

impl Expression {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Literal classification of the current text.
    pub fn mask(&self) -> QuoteMask {
        QuoteMask::scan(&self.chars)
    }

    pub fn slice(&self, span: TokenSpan) -> String {
        self.chars[span.start..span.end].iter().collect()
    }

    /// New expression with `span` replaced by `replacement`.
    pub fn splice(&self, span: TokenSpan, replacement: &str) -> Expression {
        let mut chars = Vec::with_capacity(self.chars.len() + replacement.len());
        chars.extend_from_slice(&self.chars[..span.start]);
        chars.extend(replacement.chars());
        chars.extend_from_slice(&self.chars[span.end..]);
        Expression { chars }
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Vec<char>> for Expression {
    fn from(chars: Vec<char>) -> Self {
        Self { chars }
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for c in &self.chars {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
