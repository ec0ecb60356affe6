//! Definition-time error types.
//!
//! These cover faults in the user's declarations (manifest files, path
//! expressions) and are distinct from lint findings: a finding is data in
//! the run report, while these abort before any linting starts.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JsonPathError {
    /// Compiling an expression with no segments is rejected up front so
    /// a degenerate path can never reach lint time.
    #[error("JSON path '{expr}' has no segments")]
    Empty { expr: String },
}

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("could not read manifest '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("manifest '{path}' is not valid TOML: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    JsonPath(#[from] JsonPathError),
}
