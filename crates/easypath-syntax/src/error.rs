//! Conversion failures.
//!
//! Every variant collapses to "invalid expression" for callers that only
//! care about success, but the variant and offset are kept for diagnostics.
//! Offsets count characters, not bytes.

/// Which side of an operator failed the operand check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Error that can occur while validating or rewriting an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("unknown operator `{operator}` at offset {offset}")]
    UnknownOperator { operator: String, offset: usize },

    #[error("operator at offset {offset} is missing an operand")]
    DanglingOperator { offset: usize },

    #[error("unexpected `{found}` on the {side} of the operator at offset {offset}")]
    MalformedOperand {
        found: char,
        side: Side,
        offset: usize,
    },

    #[error("unbalanced parentheses at offset {offset}")]
    UnbalancedParens { offset: usize },

    #[error("string literal starting at offset {offset} is never closed")]
    UnterminatedLiteral { offset: usize },

    #[error("unknown token `{token}` at offset {offset}")]
    UnknownToken { token: String, offset: usize },

    #[error("cannot locate the arguments of `{name}` at offset {offset}")]
    MalformedCall { name: String, offset: usize },

    #[error("no fixed point after {rounds} rewrite rounds")]
    RoundLimit { rounds: usize },
}

impl ConvertError {
    /// Stable kebab-case name of the failure, for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::UnknownOperator { .. } => "unknown-operator",
            ConvertError::DanglingOperator { .. } => "dangling-operator",
            ConvertError::MalformedOperand { .. } => "malformed-operand",
            ConvertError::UnbalancedParens { .. } => "unbalanced-parens",
            ConvertError::UnterminatedLiteral { .. } => "unterminated-literal",
            ConvertError::UnknownToken { .. } => "unknown-token",
            ConvertError::MalformedCall { .. } => "malformed-call",
            ConvertError::RoundLimit { .. } => "round-limit",
        }
    }

    /// Character offset the failure points at, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ConvertError::UnknownOperator { offset, .. }
            | ConvertError::DanglingOperator { offset }
            | ConvertError::MalformedOperand { offset, .. }
            | ConvertError::UnbalancedParens { offset }
            | ConvertError::UnterminatedLiteral { offset }
            | ConvertError::UnknownToken { offset, .. }
            | ConvertError::MalformedCall { offset, .. } => Some(*offset),
            ConvertError::RoundLimit { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_operand_side() {
        let err = ConvertError::MalformedOperand {
            found: ')',
            side: Side::Right,
            offset: 21,
        };
        assert_eq!(
            err.to_string(),
            "unexpected `)` on the right of the operator at offset 21"
        );
    }

    #[test]
    fn test_kind_and_offset() {
        let err = ConvertError::UnknownToken {
            token: "z".to_string(),
            offset: 4,
        };
        assert_eq!(err.kind(), "unknown-token");
        assert_eq!(err.offset(), Some(4));
        assert_eq!(ConvertError::RoundLimit { rounds: 9 }.offset(), None);
    }
}
