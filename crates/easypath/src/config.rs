//! Catalog loading for the command line.
//!
//! Only an explicit `--config <FILE>` is read. Without one the built-in
//! catalog applies.
//!
//! Example catalog file:
//! ```toml
//! marker = "%"
//!
//! [functions]
//! zero_arg = ["ABS", "abs", "LN", "ln"]
//! ```

use anyhow::Context;
use easypath_syntax::Catalog;
use std::path::Path;
use tracing::info;

/// Read and validate a catalog file.
pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_toml_str(&content)
        .with_context(|| format!("failed to load catalog {}", path.display()))?;
    info!(path = %path.display(), "loaded catalog");
    Ok(catalog)
}
