//! Fixed-point rewriting into FHIRPath surface syntax.
//!
//! A round tries each step once, in order:
//!
//! 1. the first `^` becomes `left.power(right)`
//! 2. the first `**` likewise
//! 3. for each zero-argument function, its first unconverted call
//!    `NAME(x)` becomes `(x).name()`
//! 4. for each log name, its first unconverted call `LOG(b, v)` becomes
//!    `(v).log(b)`
//! 5. word synonyms (`OR` -> `or`) once each as whole tokens, then symbol
//!    synonyms (`||` -> `or`) everywhere
//! 6. double-quoted literals become single-quoted
//!
//! Rounds repeat until one changes nothing. Every step removes its own
//! trigger, so the round count is bounded by the number of triggers in the
//! input; the configured cap only guards against custom catalogs whose
//! synonyms feed each other.

use crate::catalog::{Catalog, Synonym};
use crate::chars::is_word_char;
use crate::error::ConvertError;
use crate::expression::{Expression, TokenSpan};
use crate::quote::{QuoteMask, find_outside, replace_outside, retarget_delimiters};
use crate::span::{function_args, left_operand, log_args, right_operand, trim};
use tracing::{debug, trace};

/// One kind of rewrite within a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Caret,
    DoubleStar,
    Function,
    Log,
    WordSynonym,
    SymbolSynonym,
    Quotes,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Caret => "caret",
            Step::DoubleStar => "double-star",
            Step::Function => "function",
            Step::Log => "log",
            Step::WordSynonym => "word-synonym",
            Step::SymbolSynonym => "symbol-synonym",
            Step::Quotes => "quotes",
        }
    }
}

/// Result of running the engine to its fixed point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub output: Expression,
    /// Rounds run, including the final one that changed nothing.
    pub rounds: usize,
}

/// Applies rewrite rounds until the text stops changing.
pub struct RewriteEngine<'a> {
    catalog: &'a Catalog,
}

impl<'a> RewriteEngine<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Rewrite `expr` to its fixed point.
    ///
    /// Assumes `expr` passed validation.
    pub fn run(&self, expr: &Expression) -> Result<Rewrite, ConvertError> {
        let limit = self.catalog.max_rounds.unwrap_or(expr.len() + 2);
        let mut current = expr.clone();
        for round in 1..=limit {
            match self.round(&current)? {
                Some(next) => current = next,
                None => {
                    debug!(rounds = round, "rewrite reached fixed point");
                    return Ok(Rewrite {
                        output: current,
                        rounds: round,
                    });
                }
            }
        }
        Err(ConvertError::RoundLimit { rounds: limit })
    }

    /// One round; `None` when nothing changed.
    pub fn round(&self, expr: &Expression) -> Result<Option<Expression>, ConvertError> {
        let mut current = expr.clone();
        let mut changed = false;
        let mut apply = |step: Step, next: Option<Expression>, current: &mut Expression| {
            if let Some(next) = next {
                trace!(step = step.as_str(), text = %next, "rewrite");
                *current = next;
                changed = true;
            }
        };

        let next = power(&current, "^");
        apply(Step::Caret, next, &mut current);
        let next = power(&current, "**");
        apply(Step::DoubleStar, next, &mut current);

        for name in &self.catalog.functions.zero_arg {
            let next = zero_arg_call(&current, name)?;
            apply(Step::Function, next, &mut current);
        }
        for name in &self.catalog.functions.log {
            let next = log_call(&current, name)?;
            apply(Step::Log, next, &mut current);
        }

        for synonym in &self.catalog.operators.word_synonyms {
            let next = word_synonym(&current, synonym);
            apply(Step::WordSynonym, next, &mut current);
        }
        for synonym in &self.catalog.operators.symbol_synonyms {
            let next = symbol_synonym(&current, synonym);
            apply(Step::SymbolSynonym, next, &mut current);
        }

        let next = single_quotes(&current);
        apply(Step::Quotes, next, &mut current);

        Ok(changed.then_some(current))
    }
}

/// Rewrite the first `op` outside literals as a `power` call.
fn power(expr: &Expression, op: &str) -> Option<Expression> {
    let text = expr.chars();
    let mask = expr.mask();
    let at = find_outside(text, &mask, op, 0)?;
    let left = left_operand(text, &mask, at);
    let right = right_operand(text, &mask, at + op.chars().count());
    let replacement = format!("{}.power({})", expr.slice(left), expr.slice(right));
    Some(expr.splice(TokenSpan::new(left.start, right.end), &replacement))
}

/// First call of `name` that has not been converted yet: outside literals,
/// not part of a longer token, not a method already, directly followed by
/// `(`.
fn find_call(text: &[char], mask: &QuoteMask, name: &str) -> Option<usize> {
    let name_len = name.chars().count();
    let mut from = 0;
    while let Some(at) = find_outside(text, mask, name, from) {
        let before = at.checked_sub(1).map(|i| text[i]);
        let fresh = !before.is_some_and(|c| c == '.' || is_word_char(c));
        if fresh && text.get(at + name_len) == Some(&'(') {
            return Some(at);
        }
        from = at + 1;
    }
    None
}

fn zero_arg_call(expr: &Expression, name: &str) -> Result<Option<Expression>, ConvertError> {
    let text = expr.chars();
    let mask = expr.mask();
    let Some(at) = find_call(text, &mask, name) else {
        return Ok(None);
    };
    let args = function_args(text, &mask, at + name.chars().count()).ok_or_else(|| {
        ConvertError::MalformedCall {
            name: name.to_string(),
            offset: at,
        }
    })?;
    let replacement = format!("{}.{}()", expr.slice(args), name.to_lowercase());
    Ok(Some(expr.splice(TokenSpan::new(at, args.end), &replacement)))
}

fn log_call(expr: &Expression, name: &str) -> Result<Option<Expression>, ConvertError> {
    let text = expr.chars();
    let mask = expr.mask();
    let Some(at) = find_call(text, &mask, name) else {
        return Ok(None);
    };
    let args = log_args(text, &mask, at + name.chars().count()).ok_or_else(|| {
        ConvertError::MalformedCall {
            name: name.to_string(),
            offset: at,
        }
    })?;
    let replacement = format!(
        "({}).{}({})",
        expr.slice(trim(text, args.value())),
        name.to_lowercase(),
        expr.slice(trim(text, args.base())),
    );
    Ok(Some(expr.splice(TokenSpan::new(at, args.span.end), &replacement)))
}

/// Replace the first whole-token occurrence of the synonym.
fn word_synonym(expr: &Expression, synonym: &Synonym) -> Option<Expression> {
    let text = expr.chars();
    let mask = expr.mask();
    let (out, count) = replace_outside(text, &mask, &synonym.from, Some(1), |t, start, end| {
        let bounded_left = start == 0 || !is_word_char(t[start - 1]);
        let bounded_right = t.get(end).is_none_or(|c| !is_word_char(*c));
        (bounded_left && bounded_right).then(|| synonym.to.clone())
    });
    (count > 0).then(|| Expression::from(out))
}

/// Replace every occurrence of the synonym, keeping it spaced off its
/// operands.
fn symbol_synonym(expr: &Expression, synonym: &Synonym) -> Option<Expression> {
    let text = expr.chars();
    let mask = expr.mask();
    let (out, count) = replace_outside(text, &mask, &synonym.from, None, |t, start, end| {
        let mut with = String::new();
        if start > 0 && !t[start - 1].is_whitespace() {
            with.push(' ');
        }
        with.push_str(&synonym.to);
        if t.get(end).is_some_and(|c| !c.is_whitespace()) {
            with.push(' ');
        }
        Some(with)
    });
    (count > 0).then(|| Expression::from(out))
}

fn single_quotes(expr: &Expression) -> Option<Expression> {
    let (out, count) = retarget_delimiters(expr.chars(), '"', '\'');
    (count > 0).then(|| Expression::from(out))
}
