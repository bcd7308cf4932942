//! Operator and function catalogs.
//!
//! The built-in catalog matches what the FHIRPath target grammar accepts.
//! A TOML document can override any subset of it:
//!
//! ```toml
//! marker = "%"
//! max_rounds = 64
//!
//! [functions]
//! zero_arg = ["ABS", "abs"]
//! log = ["LOG", "log"]
//!
//! [[operators.word_synonyms]]
//! from = "OR"
//! to = "or"
//! ```
//!
//! Catalogs are read-only once built; share one across threads freely.

use serde::Deserialize;
use std::sync::OnceLock;

/// Error raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// A rewrite from one operator spelling to its canonical one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Synonym {
    pub from: String,
    pub to: String,
}

impl Synonym {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Recognized operator lexemes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OperatorTable {
    /// Punctuation operators, matched as whole operator runs.
    pub symbols: Vec<String>,
    /// Alphanumeric operators, accepted as tokens.
    pub words: Vec<String>,
    /// Whole-token rewrites, one occurrence per round each.
    pub word_synonyms: Vec<Synonym>,
    /// Substring rewrites, every occurrence per round.
    pub symbol_synonyms: Vec<Synonym>,
}

impl Default for OperatorTable {
    fn default() -> Self {
        Self {
            symbols: strings(&[
                "+", "-", "*", "/", "^", "**", "||", "&&", "<", ">", "=", "!=", "!~", ">=", "<=",
            ]),
            words: strings(&[
                "xor", "XOR", "implies", "IMPLIES", "and", "or", "AND", "OR",
            ]),
            word_synonyms: vec![
                Synonym::new("OR", "or"),
                Synonym::new("AND", "and"),
                Synonym::new("XOR", "xor"),
                Synonym::new("IMPLIES", "implies"),
            ],
            symbol_synonyms: vec![Synonym::new("||", "or"), Synonym::new("&&", "and")],
        }
    }
}

impl OperatorTable {
    /// Whether `op` is a known operator of either form.
    pub fn contains(&self, op: &str) -> bool {
        self.symbols.iter().any(|s| s == op) || self.is_word(op)
    }

    pub fn is_word(&self, token: &str) -> bool {
        self.words.iter().any(|w| w == token)
    }
}

/// Recognized function names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FunctionTable {
    /// `NAME(x)` becomes `(x).name()`. Tried in order each round.
    pub zero_arg: Vec<String>,
    /// `NAME(base, value)` becomes `(value).name(base)`.
    pub log: Vec<String>,
}

impl Default for FunctionTable {
    fn default() -> Self {
        Self {
            zero_arg: strings(&[
                "CEILING", "FLOOR", "ABS", "TRUNCATE", "EXP", "SQRT", "LN", "NOT", "LENGTH",
                "ceiling", "floor", "abs", "truncate", "exp", "sqrt", "ln", "not", "length",
            ]),
            log: strings(&["LOG", "log"]),
        }
    }
}

impl FunctionTable {
    pub fn contains(&self, name: &str) -> bool {
        self.zero_arg.iter().chain(&self.log).any(|f| f == name)
    }
}

/// Everything the engine needs besides the expression and its variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub operators: OperatorTable,
    pub functions: FunctionTable,
    /// Prefix placed before variable references.
    pub marker: char,
    /// Round cap for the rewrite loop. Defaults to the input length plus two.
    pub max_rounds: Option<usize>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            operators: OperatorTable::default(),
            functions: FunctionTable::default(),
            marker: '%',
            max_rounds: None,
        }
    }
}

static BUILTIN: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// Shared instance of the default catalog.
    pub fn builtin() -> &'static Catalog {
        BUILTIN.get_or_init(Catalog::default)
    }

    /// Parse a catalog from TOML, filling omitted fields from the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.check()?;
        Ok(catalog)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.max_rounds == Some(0) {
            return Err(CatalogError::Invalid(
                "max_rounds must allow at least one round".to_string(),
            ));
        }
        if self.marker.is_ascii_alphanumeric() || self.marker.is_whitespace() {
            return Err(CatalogError::Invalid(format!(
                "marker `{}` would merge into the variable name",
                self.marker
            )));
        }
        if let Some(op) = self
            .operators
            .symbols
            .iter()
            .find(|s| s.is_empty() || s.chars().any(|c| c.is_ascii_alphanumeric()))
        {
            return Err(CatalogError::Invalid(format!(
                "symbol operator `{op}` must be non-empty punctuation"
            )));
        }
        let names = self
            .operators
            .words
            .iter()
            .chain(&self.functions.zero_arg)
            .chain(&self.functions.log);
        for name in names {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(CatalogError::Invalid(format!(
                    "`{name}` is not an alphanumeric name"
                )));
            }
        }
        let mut synonyms = self
            .operators
            .word_synonyms
            .iter()
            .chain(&self.operators.symbol_synonyms);
        if let Some(s) = synonyms.find(|s| s.from.is_empty() || s.from == s.to) {
            return Err(CatalogError::Invalid(format!(
                "synonym `{}` -> `{}` never reaches a fixed point",
                s.from, s.to
            )));
        }
        Ok(())
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
