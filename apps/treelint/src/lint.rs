//! The linter orchestrator.
//!
//! Owns the top-level node list and the strict-contents policy. A run
//! snapshots the root's immediate entries first, walks the tree, then
//! reports every baseline entry no node touched (when strict mode is on)
//! at the configured severity.

use crate::context::{LintContext, RunState};
use crate::models::{RunReport, Severity};
use crate::node::LintNode;
use crate::schema::SchemaCache;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Linter {
    nodes: Vec<LintNode>,
    strict_directory_contents: bool,
    /// Severity of "unexpected entry" findings under strict mode. An
    /// explicit knob rather than a constant; defaults to `Warning`.
    unexpected_level: Severity,
    schema_dirs: Vec<PathBuf>,
    /// Lives on the linter, not the run, so repeated runs on one value
    /// parse each schema once while separate linters stay isolated.
    schema_cache: SchemaCache,
}

impl Linter {
    pub fn new(nodes: Vec<LintNode>) -> Linter {
        Linter {
            nodes,
            strict_directory_contents: true,
            unexpected_level: Severity::Warning,
            schema_dirs: Vec::new(),
            schema_cache: SchemaCache::new(),
        }
    }

    pub fn strict_directory_contents(mut self, strict: bool) -> Linter {
        self.strict_directory_contents = strict;
        self
    }

    pub fn unexpected_level(mut self, level: Severity) -> Linter {
        self.unexpected_level = level;
        self
    }

    pub fn schema_dirs(mut self, dirs: Vec<PathBuf>) -> Linter {
        self.schema_dirs = dirs;
        self
    }

    /// Run the tree against `root` and return the full report.
    pub fn run(&mut self, root: &Path) -> RunReport {
        let mut report = RunReport::default();

        let ctx = match LintContext::for_dir(root) {
            Some(c) => c,
            None => {
                report.error(
                    root,
                    format!("lint root '{}' is not a directory", root.display()),
                );
                return report;
            }
        };

        // baseline universe for strict-mode comparison, taken before any
        // node runs
        let baseline = match root_entries(root) {
            Ok(entries) => entries,
            Err(e) => {
                report.error(root, format!("could not list '{}': {}", root.display(), e));
                return report;
            }
        };

        {
            let Linter {
                nodes,
                schema_cache,
                schema_dirs,
                ..
            } = self;
            let mut run = RunState {
                report: &mut report,
                schema_cache,
                schema_dirs: schema_dirs.as_slice(),
            };
            for node in nodes.iter() {
                node.lint(&ctx, &mut run);
            }
        }

        if self.strict_directory_contents {
            for entry in &baseline {
                if !report.is_touched(entry) {
                    let kind = if entry.is_dir() { "directory" } else { "file" };
                    report.record(
                        root,
                        self.unexpected_level,
                        format!("unexpected {} '{}'", kind, entry.display()),
                    );
                }
            }
        }

        report
    }
}

fn root_entries(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(root)? {
        out.push(entry?.path());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{directory, file, files, MatchBounds};
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn strict_fixture() -> tempfile::TempDir {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"x").unwrap();
        std::fs::create_dir(tmp.path().join("b")).unwrap();
        tmp
    }

    #[test]
    fn test_strict_mode_reports_untouched_entries() {
        let tmp = strict_fixture();
        let mut linter = Linter::new(vec![file("a.txt", false, vec![])]);
        let report = linter.run(tmp.path());
        // a.txt touched; b/ never visited
        assert!(report.passed());
        let warnings: Vec<_> = report
            .all_findings()
            .filter(|(_, f)| f.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].1.message.contains("unexpected directory"));
        assert!(warnings[0].1.message.contains("b"));
    }

    #[test]
    fn test_lenient_mode_reports_nothing_extra() {
        let tmp = strict_fixture();
        let mut linter =
            Linter::new(vec![file("a.txt", false, vec![])]).strict_directory_contents(false);
        let report = linter.run(tmp.path());
        assert!(report.passed());
        assert_eq!(report.all_findings().count(), 0);
    }

    #[test]
    fn test_unexpected_level_is_configurable() {
        let tmp = strict_fixture();
        let mut linter =
            Linter::new(vec![file("a.txt", false, vec![])]).unexpected_level(Severity::Error);
        let report = linter.run(tmp.path());
        assert!(!report.passed());
        assert_eq!(report.errors().count(), 1);
    }

    #[test]
    fn test_glob_touches_count_for_strict_mode() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("one.json"), b"{}").unwrap();
        std::fs::write(tmp.path().join("two.json"), b"{}").unwrap();
        let mut linter = Linter::new(vec![files("*.json", MatchBounds::none(), vec![])]);
        let report = linter.run(tmp.path());
        assert!(report.passed());
        assert_eq!(
            report
                .all_findings()
                .filter(|(_, f)| f.severity == Severity::Warning)
                .count(),
            0
        );
    }

    #[test]
    fn test_repeated_runs_have_identical_error_sets() {
        let tmp = tempdir().unwrap();
        std::fs::write(tmp.path().join("a.txt"), b"x").unwrap();
        let mut linter = Linter::new(vec![
            file("a.txt", false, vec![]),
            directory("gone", false, vec![]),
        ]);
        let first: BTreeSet<(PathBuf, String)> = linter
            .run(tmp.path())
            .errors()
            .map(|(p, f)| (p.to_path_buf(), f.message.clone()))
            .collect();
        let second: BTreeSet<(PathBuf, String)> = linter
            .run(tmp.path())
            .errors()
            .map(|(p, f)| (p.to_path_buf(), f.message.clone()))
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn test_root_must_be_a_directory() {
        let tmp = tempdir().unwrap();
        let not_a_dir = tmp.path().join("f.txt");
        std::fs::write(&not_a_dir, b"x").unwrap();
        let mut linter = Linter::new(vec![]);
        let report = linter.run(&not_a_dir);
        assert_eq!(report.errors().count(), 1);
    }
}
