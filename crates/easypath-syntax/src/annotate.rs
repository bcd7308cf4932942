//! Variable reference tagging.

use crate::chars::is_reference_char;
use crate::expression::Expression;
use std::collections::HashSet;

/// Prefixes every standalone occurrence of a known variable with a marker.
///
/// Candidate tokens are runs of alphanumerics and quote characters, so a
/// quoted literal never matches a bare name. Tokens touching literal content
/// and tokens directly followed by `(` (method names) are never tagged.
pub struct VariableAnnotator<'a> {
    variables: &'a HashSet<String>,
    marker: char,
}

impl<'a> VariableAnnotator<'a> {
    pub fn new(variables: &'a HashSet<String>, marker: char) -> Self {
        Self { variables, marker }
    }

    pub fn annotate(&self, expr: &Expression) -> Expression {
        let text = expr.chars();
        let mask = expr.mask();
        let mut out = Vec::with_capacity(text.len() + self.variables.len());
        let mut token = String::new();
        let mut in_literal = false;

        for (i, &c) in text.iter().enumerate() {
            if !is_reference_char(c) {
                out.push(c);
                continue;
            }
            token.push(c);
            in_literal |= mask.is_inside(i);

            let next = text.get(i + 1).copied();
            if next.is_some_and(is_reference_char) {
                continue;
            }
            if !in_literal && next != Some('(') && self.variables.contains(&token) {
                out.push(self.marker);
            }
            out.extend(token.chars());
            token.clear();
            in_literal = false;
        }

        Expression::from(out)
    }
}
