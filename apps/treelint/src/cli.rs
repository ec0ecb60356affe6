//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "treelint",
    version,
    about = "Declarative directory-structure linter",
    long_about = "Treelint — verify that a directory's files, subdirectories, and JSON content match a declared expectation tree.\n\nConfiguration precedence: CLI > treelint.toml > manifest > defaults.",
    after_help = "Examples:\n  treelint lint\n  treelint lint --root . --manifest layout.toml\n  treelint lint --output json --schema-dir schemas\n  treelint lint --lenient",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current treelint version.")]
    Version,
    /// Lint a directory against an expectation manifest
    #[command(
        about = "Run structural lint",
        long_about = "Walk the expectation tree against the root directory and report every deviation. Errors fail the run; warnings are informational.",
        after_help = "Examples:\n  treelint lint --manifest layout.toml\n  treelint lint --output json --properties"
    )]
    Lint {
        #[arg(long, help = "Directory to lint (default: current dir)")]
        root: Option<String>,
        #[arg(long, help = "Path to the expectation manifest TOML")]
        manifest: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Report entries no node touched (overrides manifest)")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "strict", help = "Ignore entries no node touched (overrides manifest)")]
        lenient: bool,
        #[arg(long, help = "Severity for unexpected entries: warning|error")]
        unexpected: Option<String>,
        #[arg(long = "schema-dir", help = "Extra JSON schema search directory (repeatable)")]
        schema_dirs: Vec<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Also print values collected by collect_values rules")]
        properties: bool,
    },
}
