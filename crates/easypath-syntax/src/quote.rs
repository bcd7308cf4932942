//! Quote-aware character scanning.
//!
//! Single and double quotes both open string literals. A literal only closes
//! on an unescaped occurrence of the character that opened it, and a
//! backslash inside a literal escapes exactly the next character.
//!
//! The opening delimiter counts as inside the literal and the closing
//! delimiter as outside, so a search that skips masked positions never starts
//! a match on an opening quote or on literal content.

/// Classification of one position in a left-to-right scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Plain expression text.
    Outside,
    /// The quote character that opens a literal.
    Open,
    /// Literal content, including escapes.
    Inside,
    /// The quote character that closes a literal.
    Close,
}

impl Mark {
    pub fn is_inside(self) -> bool {
        matches!(self, Mark::Open | Mark::Inside)
    }
}

pub fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Incremental literal tracker, fed one character at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuoteState {
    delimiter: Option<char>,
    escaped: bool,
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance over `c` and classify it.
    pub fn step(&mut self, c: char) -> Mark {
        match self.delimiter {
            None if is_quote(c) => {
                self.delimiter = Some(c);
                Mark::Open
            }
            None => Mark::Outside,
            Some(_) if self.escaped => {
                self.escaped = false;
                Mark::Inside
            }
            Some(_) if c == '\\' => {
                self.escaped = true;
                Mark::Inside
            }
            Some(d) if c == d => {
                self.delimiter = None;
                Mark::Close
            }
            Some(_) => Mark::Inside,
        }
    }

    pub fn in_literal(&self) -> bool {
        self.delimiter.is_some()
    }

    pub fn in_escape(&self) -> bool {
        self.escaped
    }
}

/// Per-position literal classification of a whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteMask {
    marks: Vec<Mark>,
    unclosed: Option<usize>,
}

impl QuoteMask {
    pub fn scan(text: &[char]) -> Self {
        let mut state = QuoteState::new();
        let mut marks = Vec::with_capacity(text.len());
        let mut opened_at = None;
        for (i, &c) in text.iter().enumerate() {
            let mark = state.step(c);
            if mark == Mark::Open {
                opened_at = Some(i);
            }
            marks.push(mark);
        }
        Self {
            marks,
            unclosed: if state.in_literal() { opened_at } else { None },
        }
    }

    /// Mark at `i`; positions past the end are outside.
    pub fn mark(&self, i: usize) -> Mark {
        self.marks.get(i).copied().unwrap_or(Mark::Outside)
    }

    pub fn is_inside(&self, i: usize) -> bool {
        self.mark(i).is_inside()
    }

    /// Offset of the opening quote of a literal still open at end of text.
    pub fn unclosed(&self) -> Option<usize> {
        self.unclosed
    }
}

/// The text with every in-literal character elided.
///
/// Only useful for containment checks; offsets into the result do not map
/// back onto the original text.
pub fn strip_literals(text: &[char], mask: &QuoteMask) -> String {
    text.iter()
        .enumerate()
        .filter(|(i, _)| !mask.is_inside(*i))
        .map(|(_, c)| *c)
        .collect()
}

fn starts_with_at(text: &[char], at: usize, pattern: &[char]) -> bool {
    text.len() >= at + pattern.len() && text[at..at + pattern.len()] == *pattern
}

/// First occurrence of `pattern` at or after `from` whose start lies outside
/// any literal.
pub fn find_outside(text: &[char], mask: &QuoteMask, pattern: &str, from: usize) -> Option<usize> {
    let pattern: Vec<char> = pattern.chars().collect();
    if pattern.is_empty() {
        return None;
    }
    (from..text.len()).find(|&i| !mask.is_inside(i) && starts_with_at(text, i, &pattern))
}

/// Replace non-overlapping occurrences of `pattern` that start outside any
/// literal.
///
/// `replacement` sees the whole text and the match bounds and may decline a
/// match by returning `None`. At most `limit` matches are replaced when a
/// limit is given. Returns the new text and the number of replacements.
pub fn replace_outside<F>(
    text: &[char],
    mask: &QuoteMask,
    pattern: &str,
    limit: Option<usize>,
    mut replacement: F,
) -> (Vec<char>, usize)
where
    F: FnMut(&[char], usize, usize) -> Option<String>,
{
    let pattern_len = pattern.chars().count();
    let mut out = Vec::with_capacity(text.len());
    let mut copied = 0;
    let mut replaced = 0;
    let mut from = 0;
    while limit.is_none_or(|max| replaced < max) {
        let Some(start) = find_outside(text, mask, pattern, from) else {
            break;
        };
        let end = start + pattern_len;
        match replacement(text, start, end) {
            Some(with) => {
                out.extend_from_slice(&text[copied..start]);
                out.extend(with.chars());
                copied = end;
                from = end;
                replaced += 1;
            }
            None => from = start + 1,
        }
    }
    out.extend_from_slice(&text[copied..]);
    (out, replaced)
}

/// Rewrite the delimiters of every literal opened with `from` to `to`.
///
/// Bare occurrences of `to` inside a retargeted literal are escaped so the
/// literal still closes where it did. Delimiters of literals opened with any
/// other quote are left alone. Returns the new text and the number of
/// literals retargeted.
pub fn retarget_delimiters(text: &[char], from: char, to: char) -> (Vec<char>, usize) {
    let mut state = QuoteState::new();
    let mut out = Vec::with_capacity(text.len());
    let mut retargeting = false;
    let mut count = 0;
    for &c in text {
        let escaped = state.in_escape();
        match state.step(c) {
            Mark::Open if c == from => {
                retargeting = true;
                count += 1;
                out.push(to);
            }
            Mark::Close if retargeting => {
                retargeting = false;
                out.push(to);
            }
            Mark::Inside if retargeting && c == to && !escaped => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    (out, count)
}
