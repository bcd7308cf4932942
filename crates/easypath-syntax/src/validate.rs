//! Input validation.
//!
//! Two independent passes over the raw expression. The operator pass checks
//! every punctuation run is a known operator with an operand on each side,
//! literal content included;
//! the token pass checks every alphanumeric run is something the rewrite
//! engine understands and that parentheses and literals are balanced. The
//! first violation found rejects the whole input.

use crate::catalog::Catalog;
use crate::chars::{is_left_terminator, is_operator_char, is_right_starter, is_word_char};
use crate::error::{ConvertError, Side};
use crate::expression::Expression;
use std::collections::HashSet;

/// Validates expressions against a catalog and a set of variable names.
pub struct Validator<'a> {
    catalog: &'a Catalog,
    variables: &'a HashSet<String>,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a Catalog, variables: &'a HashSet<String>) -> Self {
        Self { catalog, variables }
    }

    /// Run both passes, operator context first.
    pub fn validate(&self, expr: &Expression) -> Result<(), ConvertError> {
        self.check_operators(expr)?;
        self.check_tokens(expr)
    }

    /// Operator-context pass.
    pub fn check_operators(&self, expr: &Expression) -> Result<(), ConvertError> {
        let text = expr.chars();
        let len = text.len();
        let mut run_start: Option<usize> = None;

        for (j, &c) in text.iter().enumerate() {
            if is_operator_char(c) {
                if j == 0 || j == len - 1 {
                    return Err(ConvertError::DanglingOperator { offset: j });
                }
                run_start.get_or_insert(j);
                continue;
            }
            if let Some(start) = run_start.take() {
                self.check_operator_run(text, start, j)?;
            }
        }
        Ok(())
    }

    fn check_operator_run(
        &self,
        text: &[char],
        start: usize,
        end: usize,
    ) -> Result<(), ConvertError> {
        let op: String = text[start..end].iter().collect();
        if !self.catalog.operators.contains(&op) {
            return Err(ConvertError::UnknownOperator {
                operator: op,
                offset: start,
            });
        }

        let left = text[..start].iter().rposition(|c| !c.is_whitespace());
        match left {
            None => return Err(ConvertError::DanglingOperator { offset: start }),
            Some(i) if !is_left_terminator(text[i]) => {
                return Err(ConvertError::MalformedOperand {
                    found: text[i],
                    side: Side::Left,
                    offset: start,
                });
            }
            Some(_) => {}
        }

        let right = text[end..].iter().position(|c| !c.is_whitespace());
        match right.map(|i| end + i) {
            None => Err(ConvertError::DanglingOperator { offset: start }),
            Some(i) if !is_right_starter(text[i]) => Err(ConvertError::MalformedOperand {
                found: text[i],
                side: Side::Right,
                offset: start,
            }),
            Some(_) => Ok(()),
        }
    }

    /// Token and balance pass.
    pub fn check_tokens(&self, expr: &Expression) -> Result<(), ConvertError> {
        let text = expr.chars();
        let mask = expr.mask();
        let mut depth = 0usize;
        let mut token_start = 0;
        let mut token = String::new();

        for (i, &c) in text.iter().enumerate() {
            if mask.is_inside(i) {
                continue;
            }

            match c {
                '(' => depth += 1,
                ')' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or(ConvertError::UnbalancedParens { offset: i })?;
                }
                _ => {}
            }

            if is_word_char(c) {
                if token.is_empty() {
                    token_start = i;
                }
                token.push(c);
            }

            let next = text.get(i + 1).copied();
            if next.is_some_and(is_word_char) {
                continue;
            }
            if !token.is_empty() {
                self.check_token(&token, token_start, next)?;
                token.clear();
            }
        }

        if let Some(offset) = mask.unclosed() {
            return Err(ConvertError::UnterminatedLiteral { offset });
        }
        if depth != 0 {
            return Err(ConvertError::UnbalancedParens { offset: text.len() });
        }
        Ok(())
    }

    fn check_token(
        &self,
        token: &str,
        offset: usize,
        next: Option<char>,
    ) -> Result<(), ConvertError> {
        let is_call = next == Some('(') && self.catalog.functions.contains(token);
        if is_call
            || self.variables.contains(token)
            || self.catalog.operators.is_word(token)
            || is_numeric_literal(token)
        {
            return Ok(());
        }
        Err(ConvertError::UnknownToken {
            token: token.to_string(),
            offset,
        })
    }
}

/// Whole-token numeric literal. Decimals reach here as two digit runs.
fn is_numeric_literal(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn check(input: &str, names: &[&str]) -> Result<(), ConvertError> {
        let variables = vars(names);
        Validator::new(Catalog::builtin(), &variables).validate(&Expression::new(input))
    }

    const ABC: &[&str] = &["a", "b", "c", "d", "e"];

    #[test]
    fn test_accepts_arithmetic() {
        assert_eq!(check("(a+b) * 3.5 - c", ABC), Ok(()));
        assert_eq!(check("-a^-3.3", ABC), Ok(()));
        assert_eq!(check("(a < 3) and b", ABC), Ok(()));
        assert_eq!(check("LOG(2, ABS(a))", ABC), Ok(()));
    }

    #[test]
    fn test_unknown_operator() {
        assert_eq!(
            check("a$b", ABC),
            Err(ConvertError::UnknownOperator {
                operator: "$".into(),
                offset: 1
            })
        );
        assert!(matches!(
            check("a++b", ABC),
            Err(ConvertError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_dangling_operator() {
        assert_eq!(check("#", ABC), Err(ConvertError::DanglingOperator { offset: 0 }));
        assert_eq!(check("+583", ABC), Err(ConvertError::DanglingOperator { offset: 0 }));
        assert_eq!(check("a+", ABC), Err(ConvertError::DanglingOperator { offset: 1 }));
        assert_eq!(check(" +a", ABC), Err(ConvertError::DanglingOperator { offset: 1 }));
        assert_eq!(check("a+ ", ABC), Err(ConvertError::DanglingOperator { offset: 1 }));
    }

    #[test]
    fn test_malformed_operand() {
        assert_eq!(
            check("ABS(c^)", ABC),
            Err(ConvertError::MalformedOperand {
                found: ')',
                side: Side::Right,
                offset: 5
            })
        );
        assert_eq!(
            check("(* a)", ABC),
            Err(ConvertError::MalformedOperand {
                found: '(',
                side: Side::Left,
                offset: 1
            })
        );
    }

    #[test]
    fn test_operator_pass_reads_literal_content() {
        assert_eq!(check("'a**b'", &[]), Ok(()));
        assert_eq!(
            check("'hello, world!'", &[]),
            Err(ConvertError::UnknownOperator {
                operator: "!".into(),
                offset: 13
            })
        );
        assert!(matches!(
            check("a = 'x#y'", ABC),
            Err(ConvertError::UnknownOperator { .. })
        ));
    }

    #[test]
    fn test_unbalanced_parens() {
        assert_eq!(check(")(a+b)", ABC), Err(ConvertError::UnbalancedParens { offset: 0 }));
        assert_eq!(
            check("CEILING(ABS(a+b)", ABC),
            Err(ConvertError::UnbalancedParens { offset: 16 })
        );
        assert_eq!(
            check("CEILING(FLOOR(ABS(a+b*3))))", ABC),
            Err(ConvertError::UnbalancedParens { offset: 26 })
        );
        assert_eq!(check("LENGTH(')')", &[]), Ok(()));
    }

    #[test]
    fn test_unterminated_literal() {
        assert_eq!(
            check("a + 'b", ABC),
            Err(ConvertError::UnterminatedLiteral { offset: 4 })
        );
        assert_eq!(
            check(r"'it\'", &[]),
            Err(ConvertError::UnterminatedLiteral { offset: 0 })
        );
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(
            check("a+b+z", &["a", "b"]),
            Err(ConvertError::UnknownToken {
                token: "z".into(),
                offset: 4
            })
        );
        assert!(matches!(
            check("NOTAFUNCTION(a+b)", ABC),
            Err(ConvertError::UnknownToken { .. })
        ));
        assert!(matches!(
            check("0x1F + a", ABC),
            Err(ConvertError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_function_name_needs_call() {
        assert_eq!(
            check("a NOT b", ABC),
            Err(ConvertError::UnknownToken {
                token: "NOT".into(),
                offset: 2
            })
        );
        assert_eq!(check("NOT(a)", ABC), Ok(()));
    }

    #[test]
    fn test_variables_are_case_sensitive() {
        assert_eq!(check("Patient + Age", &["Patient", "Age"]), Ok(()));
        assert!(check("patient + Age", &["Patient", "Age"]).is_err());
    }
}
