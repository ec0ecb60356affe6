//! Treelint CLI binary entry point.
//! Resolves configuration, loads the manifest, runs the linter, and
//! prints results. Exit codes: 0 pass, 1 lint errors, 2 setup problems.

use clap::Parser;
use owo_colors::OwoColorize;
use treelint::cli::{Cli, Commands};
use treelint::config;
use treelint::manifest::Manifest;
use treelint::models::Severity;
use treelint::output;

fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

fn note_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            root,
            manifest,
            output: output_mode,
            strict,
            lenient,
            unexpected,
            schema_dirs,
            properties,
        } => {
            let cli_strict = if strict {
                Some(true)
            } else if lenient {
                Some(false)
            } else {
                None
            };
            let cli_unexpected = match unexpected.as_deref() {
                None => None,
                Some("warning") | Some("warn") => Some(Severity::Warning),
                Some("error") => Some(Severity::Error),
                Some(other) => {
                    eprintln!(
                        "{} {}",
                        error_prefix(),
                        format!("invalid --unexpected value '{}' (use warning|error)", other)
                    );
                    std::process::exit(2);
                }
            };
            let eff = config::resolve_effective(
                root.as_deref(),
                manifest.as_deref(),
                output_mode.as_deref(),
                cli_strict,
                cli_unexpected,
                &schema_dirs,
            );
            if config::load_config(&eff.repo_root).is_none() {
                eprintln!(
                    "{} {}",
                    note_prefix(),
                    "No treelint.toml found; using defaults."
                );
            }
            if !eff.manifest.is_file() {
                eprintln!(
                    "{} {}",
                    error_prefix(),
                    format!(
                        "Manifest not found: {} (pass --manifest or configure treelint.toml)",
                        eff.manifest.display()
                    )
                );
                std::process::exit(2);
            }
            let manifest = match Manifest::load(&eff.manifest) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            let mut linter = match manifest.into_linter(eff.schema_dirs.clone()) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    std::process::exit(2);
                }
            };
            // CLI/config policy overrides beat the manifest's declaration
            if let Some(s) = eff.strict {
                linter = linter.strict_directory_contents(s);
            }
            if let Some(level) = eff.unexpected {
                linter = linter.unexpected_level(level);
            }
            let report = linter.run(&eff.root);
            output::print_report(&report, &eff.output, properties);
            if !report.passed() {
                std::process::exit(1);
            }
        }
    }
}
