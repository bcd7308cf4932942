//! Translate informal algebra into FHIRPath surface syntax.
//!
//! `easypath-syntax` accepts the expressions people write by hand
//! (`LN(a) ^ 2 || b`) and rewrites them into what a FHIRPath engine expects
//! (`(%a).ln().power(2) or %b`). It works on the text directly: there is no
//! parse tree, and precedence is whatever falls out of the rewrite order.
//!
//! # Pipeline
//!
//! ```text
//! input ──> Validator ──> RewriteEngine ──> VariableAnnotator ──> output
//!           (validate.rs)  (rewrite.rs)      (annotate.rs)
//!                │
//!                └──> ConvertError (no partial output)
//! ```
//!
//! Every stage skips string-literal content using the scanner in
//! [`quote`], which tracks which quote opened a literal and backslash
//! escapes within it.
//!
//! # Example
//!
//! ```
//! use easypath_syntax::convert;
//!
//! assert_eq!(convert("a^b", ["a", "b"]).unwrap(), "%a.power(%b)");
//! assert_eq!(convert("LOG(a, b)", ["a", "b"]).unwrap(), "(%b).log(%a)");
//! assert!(convert("a+b+z", ["a", "b"]).is_err());
//! ```

pub mod annotate;
pub mod catalog;
pub mod chars;
pub mod error;
pub mod expression;
pub mod quote;
pub mod rewrite;
pub mod span;
pub mod validate;

pub use annotate::VariableAnnotator;
pub use catalog::{Catalog, CatalogError, FunctionTable, OperatorTable, Synonym};
pub use error::{ConvertError, Side};
pub use expression::{Expression, TokenSpan};
pub use rewrite::{Rewrite, RewriteEngine};
pub use validate::Validator;

use std::collections::HashSet;
use tracing::debug;

/// Case-sensitive names the caller allows as variable references.
pub type VariableSet = HashSet<String>;

/// Converts expressions with a fixed catalog.
#[derive(Debug, Clone, Copy)]
pub struct Converter<'a> {
    catalog: &'a Catalog,
}

impl Default for Converter<'static> {
    fn default() -> Self {
        Self::new(Catalog::builtin())
    }
}

impl<'a> Converter<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'a Catalog {
        self.catalog
    }

    /// Validate, rewrite to a fixed point, then tag variables.
    pub fn convert(
        &self,
        expression: &str,
        variables: &VariableSet,
    ) -> Result<String, ConvertError> {
        let expr = Expression::new(expression);
        if let Err(err) = Validator::new(self.catalog, variables).validate(&expr) {
            debug!(kind = err.kind(), offset = ?err.offset(), "rejected expression");
            return Err(err);
        }
        let rewrite = RewriteEngine::new(self.catalog).run(&expr)?;
        let output =
            VariableAnnotator::new(variables, self.catalog.marker).annotate(&rewrite.output);
        debug!(rounds = rewrite.rounds, "converted expression");
        Ok(output.to_string())
    }

    /// Validate and rewrite without tagging variables.
    pub fn rewrite(
        &self,
        expression: &str,
        variables: &VariableSet,
    ) -> Result<String, ConvertError> {
        let expr = Expression::new(expression);
        Validator::new(self.catalog, variables).validate(&expr)?;
        Ok(RewriteEngine::new(self.catalog).run(&expr)?.output.to_string())
    }
}

/// Convert `expression` with the built-in catalog.
pub fn convert<I, S>(expression: &str, variables: I) -> Result<String, ConvertError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    convert_with(Catalog::builtin(), expression, variables)
}

/// Convert `expression` with a caller-supplied catalog.
pub fn convert_with<I, S>(
    catalog: &Catalog,
    expression: &str,
    variables: I,
) -> Result<String, ConvertError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let variables: VariableSet = variables.into_iter().map(Into::into).collect();
    Converter::new(catalog).convert(expression, &variables)
}
