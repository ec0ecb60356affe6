//! Evaluation context: the path currently under inspection plus the
//! run-wide mutable state every node contributes to.
//!
//! A `LintContext` is only ever constructed for a path that passed an
//! existence/kind check; descent helpers return `None` instead of ever
//! wrapping a missing or wrong-kind target.

use crate::models::RunReport;
use crate::schema::SchemaCache;
use std::path::{Path, PathBuf};

/// Immutable "where we are" value. Derived per descent step, never mutated.
#[derive(Debug, Clone)]
pub struct LintContext {
    path: PathBuf,
}

impl LintContext {
    /// Context rooted at an existing directory.
    pub fn for_dir(path: &Path) -> Option<LintContext> {
        path.is_dir().then(|| LintContext {
            path: path.to_path_buf(),
        })
    }

    /// Context rooted at an existing regular file.
    pub fn for_file(path: &Path) -> Option<LintContext> {
        path.is_file().then(|| LintContext {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Descend into a named subdirectory of the current path.
    pub fn cd(&self, dir: &str) -> Option<LintContext> {
        Self::for_dir(&self.path.join(dir))
    }

    /// Resolve a named file relative to the current path.
    pub fn with_filename(&self, filename: &str) -> Option<LintContext> {
        Self::for_file(&self.path.join(filename))
    }
}

/// Mutable run-wide state threaded by `&mut` through every evaluation
/// call. Evaluation is strictly sequential, so plain mutable borrows are
/// enough; a parallel evaluator would have to serialize access instead.
pub struct RunState<'a> {
    pub report: &'a mut RunReport,
    pub schema_cache: &'a mut SchemaCache,
    /// Search directories for schema filename resolution, in order.
    pub schema_dirs: &'a [PathBuf],
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_context_kind_checks() {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("a.txt"), b"x").unwrap();

        let ctx = LintContext::for_dir(root).unwrap();
        assert!(ctx.cd("sub").is_some());
        assert!(ctx.cd("missing").is_none());
        // wrong kind: a file is not a directory and vice versa
        assert!(ctx.cd("a.txt").is_none());
        assert!(ctx.with_filename("a.txt").is_some());
        assert!(ctx.with_filename("sub").is_none());
        assert!(LintContext::for_file(root).is_none());
    }
}
