//! Operand and argument-list spans.
//!
//! All parenthesis counting skips positions inside string literals. Operand
//! spans never include the whitespace between an operand and its operator;
//! callers replace `[left.start, right.end)` and so drop that whitespace.

use crate::chars::{is_left_run_char, is_right_run_char};
use crate::expression::TokenSpan;
use crate::quote::QuoteMask;

/// Offset of the `)` matching the `(` at `open`.
pub fn matching_close(text: &[char], mask: &QuoteMask, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, &c) in text.iter().enumerate().skip(open) {
        if mask.is_inside(i) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Offset of the `(` matching the `)` at `close`.
pub fn matching_open(text: &[char], mask: &QuoteMask, close: usize) -> Option<usize> {
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        if mask.is_inside(i) {
            continue;
        }
        match text[i] {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The operand ending just before the operator at `op_pos`.
///
/// A parenthesized group when the nearest non-space character is `)`,
/// otherwise a run of alphanumerics, dots, hyphens and inner spaces.
pub fn left_operand(text: &[char], mask: &QuoteMask, op_pos: usize) -> TokenSpan {
    let mut end = op_pos;
    while end > 0 && text[end - 1].is_whitespace() {
        end -= 1;
    }
    if end > 0 && text[end - 1] == ')' {
        return match matching_open(text, mask, end - 1) {
            Some(open) => TokenSpan::new(open, end),
            None => TokenSpan::empty(end),
        };
    }
    let mut start = end;
    while start > 0 && is_left_run_char(text[start - 1]) {
        start -= 1;
    }
    while start < end && text[start].is_whitespace() {
        start += 1;
    }
    TokenSpan::new(start, end)
}

/// The operand starting just after an operator that ends at `op_end`.
///
/// A parenthesized group through its matching `)` when the nearest
/// non-space character is `(`. Otherwise a run of alphanumerics, dots,
/// hyphens, spaces and balanced parentheses; a `)` closing a group opened
/// before the operand ends the run.
pub fn right_operand(text: &[char], mask: &QuoteMask, op_end: usize) -> TokenSpan {
    let mut start = op_end;
    while start < text.len() && text[start].is_whitespace() {
        start += 1;
    }
    if text.get(start) == Some(&'(') {
        let end = matching_close(text, mask, start).map_or(text.len(), |close| close + 1);
        return TokenSpan::new(start, end);
    }

    let mut depth = 0usize;
    let mut end = start;
    let mut balanced_end = start;
    while end < text.len() && is_right_run_char(text[end]) {
        match text[end] {
            '(' => depth += 1,
            ')' if depth == 0 => break,
            ')' => depth -= 1,
            _ => {}
        }
        end += 1;
        if depth == 0 {
            balanced_end = end;
        }
    }
    let mut end = balanced_end;
    while end > start && text[end - 1].is_whitespace() {
        end -= 1;
    }
    TokenSpan::new(start, end)
}

/// Argument list of a call whose name ends at `name_end`, from the `(`
/// through its matching `)`.
pub fn function_args(text: &[char], mask: &QuoteMask, name_end: usize) -> Option<TokenSpan> {
    if text.get(name_end) != Some(&'(') {
        return None;
    }
    let close = matching_close(text, mask, name_end)?;
    Some(TokenSpan::new(name_end, close + 1))
}

/// Argument list of a two-argument call, split at its first top-level comma.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogArgs {
    /// From the `(` through the matching `)`.
    pub span: TokenSpan,
    pub comma: usize,
}

impl LogArgs {
    /// First argument, untrimmed.
    pub fn base(&self) -> TokenSpan {
        TokenSpan::new(self.span.start + 1, self.comma)
    }

    /// Second argument, untrimmed.
    pub fn value(&self) -> TokenSpan {
        TokenSpan::new(self.comma + 1, self.span.end - 1)
    }
}

/// Like [`function_args`], also locating the comma between base and value.
pub fn log_args(text: &[char], mask: &QuoteMask, name_end: usize) -> Option<LogArgs> {
    let span = function_args(text, mask, name_end)?;
    let mut depth = 0usize;
    let comma = (span.start..span.end).find(|&i| {
        if mask.is_inside(i) {
            return false;
        }
        match text[i] {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' => return depth == 1,
            _ => {}
        }
        false
    })?;
    Some(LogArgs { span, comma })
}

/// `span` with surrounding whitespace removed.
pub fn trim(text: &[char], span: TokenSpan) -> TokenSpan {
    let mut start = span.start;
    let mut end = span.end;
    while start < end && text[start].is_whitespace() {
        start += 1;
    }
    while end > start && text[end - 1].is_whitespace() {
        end -= 1;
    }
    TokenSpan::new(start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(s: &str) -> (Vec<char>, QuoteMask) {
        let text: Vec<char> = s.chars().collect();
        let mask = QuoteMask::scan(&text);
        (text, mask)
    }

    fn show(text: &[char], span: TokenSpan) -> String {
        text[span.start..span.end].iter().collect()
    }

    #[test]
    fn test_left_group() {
        let (text, mask) = setup("(a+b)  ** c");
        let span = left_operand(&text, &mask, 7);
        assert_eq!(show(&text, span), "(a+b)");
    }

    #[test]
    fn test_left_group_ignores_quoted_parens() {
        let (text, mask) = setup("(a + ')')^2");
        let span = left_operand(&text, &mask, 9);
        assert_eq!(span, TokenSpan::new(0, 9));
    }

    #[test]
    fn test_left_run_is_trimmed() {
        let (text, mask) = setup("x + -a ^ 2");
        let span = left_operand(&text, &mask, 7);
        assert_eq!(show(&text, span), "-a");
    }

    #[test]
    fn test_left_run_at_start() {
        let (text, mask) = setup("3.3^4.2");
        assert_eq!(left_operand(&text, &mask, 3), TokenSpan::new(0, 3));
    }

    #[test]
    fn test_right_group_matches_nesting() {
        let (text, mask) = setup("a^((b+c)*d) + 1");
        let span = right_operand(&text, &mask, 2);
        assert_eq!(show(&text, span), "((b+c)*d)");
    }

    #[test]
    fn test_right_run_stops_at_enclosing_close() {
        let (text, mask) = setup("ABS(c^2) * 3");
        let span = right_operand(&text, &mask, 6);
        assert_eq!(show(&text, span), "2");
    }

    #[test]
    fn test_right_run_takes_call() {
        let (text, mask) = setup("(a+b)  ** LN(c)");
        let span = right_operand(&text, &mask, 9);
        assert_eq!(show(&text, span), "LN(c)");
    }

    #[test]
    fn test_right_run_drops_unbalanced_tail() {
        let (text, mask) = setup("a^b('x')");
        let span = right_operand(&text, &mask, 2);
        assert_eq!(show(&text, span), "b");
    }

    #[test]
    fn test_right_run_negative_decimal() {
        let (text, mask) = setup("-a^-3.3 + b");
        let span = right_operand(&text, &mask, 3);
        assert_eq!(show(&text, span), "-3.3");
    }

    #[test]
    fn test_function_args() {
        let (text, mask) = setup("LENGTH('a)' + b) + 1");
        let span = function_args(&text, &mask, 6).unwrap();
        assert_eq!(show(&text, span), "('a)' + b)");
        assert!(function_args(&text, &mask, 5).is_none());
    }

    #[test]
    fn test_log_args_first_top_level_comma() {
        let (text, mask) = setup("LOG(f(1, 2), ',', x)");
        let args = log_args(&text, &mask, 3).unwrap();
        assert_eq!(show(&text, args.base()), "f(1, 2)");
        assert_eq!(show(&text, trim(&text, args.value())), "',', x");
    }

    #[test]
    fn test_log_args_requires_comma() {
        let (text, mask) = setup("LOG(a)");
        assert!(log_args(&text, &mask, 3).is_none());
    }
}
