//! `easypath` command line.
//!
//! ```text
//! easypath [VARIABLES]... EXPRESSION
//! ```
//!
//! Prints the converted expression, or `null` when the input is rejected.

mod config;

use clap::Parser;
use easypath_syntax::{Catalog, ConvertError, Converter, VariableSet};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage:\n\teasypath var1 var2 \"var1 + var2\"\n\n\
    \tLast argument is the expression, all other arguments are interpreted as variables.\n";

/// Convert informal algebra into a FHIRPath expression.
#[derive(Parser, Debug)]
#[command(name = "easypath", version, about)]
struct Cli {
    /// Variable names followed by the expression
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Report why a rejected expression failed and exit non-zero
    #[arg(long)]
    explain: bool,

    /// Print {"expression", "output", "error", "kind"} as JSON
    #[arg(long)]
    json: bool,

    /// Catalog file overriding the built-in operators and functions
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report<'a> {
    expression: &'a str,
    output: Option<&'a str>,
    error: Option<String>,
    kind: Option<&'static str>,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Returns whether the process should exit successfully.
fn run(cli: Cli) -> anyhow::Result<bool> {
    let Some((expression, names)) = cli.args.split_last() else {
        println!("{USAGE}");
        return Ok(true);
    };

    let loaded;
    let catalog = match &cli.config {
        Some(path) => {
            loaded = config::load_catalog(path)?;
            &loaded
        }
        None => Catalog::builtin(),
    };
    let variables: VariableSet = names.iter().cloned().collect();
    let result = Converter::new(catalog).convert(expression, &variables);

    if cli.json {
        let report = Report {
            expression,
            output: result.as_deref().ok(),
            error: result.as_ref().err().map(ConvertError::to_string),
            kind: result.as_ref().err().map(ConvertError::kind),
        };
        println!("{}", serde_json::to_string(&report)?);
    } else {
        println!("{}", result.as_deref().unwrap_or("null"));
    }

    match result {
        Err(err) if cli.explain => {
            eprintln!("error: {err}");
            Ok(false)
        }
        _ => Ok(true),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
