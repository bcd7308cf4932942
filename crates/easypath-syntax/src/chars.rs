//! Character classes shared by the validator, span finder and annotator.
//!
//! Hyphen counts both as an operand character (negative numbers, `a-b` left
//! unsplit) and as arithmetic minus, so it never starts an operator run.

use crate::quote::is_quote;

/// Characters that make up tokens.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Characters that accumulate into operator runs.
pub fn is_operator_char(c: char) -> bool {
    !(is_word_char(c)
        || matches!(c, '.' | ',' | '(' | ')' | '\\' | '-')
        || is_quote(c)
        || c.is_whitespace())
}

/// What may sit immediately left of an operator, whitespace aside.
pub fn is_left_terminator(c: char) -> bool {
    is_word_char(c) || matches!(c, '.' | ',' | ')' | '-') || is_quote(c)
}

/// What may sit immediately right of an operator, whitespace aside.
pub fn is_right_starter(c: char) -> bool {
    is_word_char(c) || matches!(c, '.' | '(' | '-') || is_quote(c)
}

/// Characters of a bare left operand.
pub fn is_left_run_char(c: char) -> bool {
    is_word_char(c) || matches!(c, '.' | '-') || c.is_whitespace()
}

/// Characters of a bare right operand.
pub fn is_right_run_char(c: char) -> bool {
    is_word_char(c) || matches!(c, '.' | '-' | '(' | ')') || c.is_whitespace()
}

/// Characters the annotator folds into a candidate variable token.
pub fn is_reference_char(c: char) -> bool {
    is_word_char(c) || is_quote(c)
}
