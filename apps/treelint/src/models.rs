//! Shared data models for lint results, summaries, and collected properties.

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
/// Result severity. Any `Error` anywhere in a report fails the run;
/// `Warning` is informational only.
pub enum Severity {
    Error,
    Warning,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// A single finding recorded against a filesystem path.
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub touched: usize,
}

#[derive(Serialize, Debug, Default, Clone)]
#[serde(transparent)]
/// Values collected by JSON-path rules, grouped as group -> key -> values.
///
/// Values accumulate in append order across every match of a run; repeated
/// collection under the same group/key never overwrites earlier entries.
pub struct PropertyStore {
    groups: BTreeMap<String, BTreeMap<String, Vec<Json>>>,
}

impl PropertyStore {
    pub fn append(&mut self, group: &str, key: &str, value: Json) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(value);
    }

    pub fn get(&self, group: &str, key: &str) -> Option<&[Json]> {
        self.groups.get(group)?.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, Vec<Json>>)> {
        self.groups.iter().map(|(g, m)| (g.as_str(), m))
    }
}

#[derive(Serialize, Debug, Default)]
/// Full result of one linter run.
///
/// `findings` maps every path that was visited or reported on to its
/// ordered findings; a touched path with no findings still appears as a
/// key with an empty list. `touched` is the authoritative visited set,
/// kept separately so "zero findings" and "never visited" stay distinct.
pub struct RunReport {
    pub findings: BTreeMap<PathBuf, Vec<Finding>>,
    pub touched: BTreeSet<PathBuf>,
    pub properties: PropertyStore,
}

impl RunReport {
    /// Record a fatal finding at `path`.
    pub fn error(&mut self, path: &Path, message: impl Into<String>) {
        self.findings.entry(path.to_path_buf()).or_default().push(Finding {
            severity: Severity::Error,
            message: message.into(),
        });
    }

    /// Record a non-fatal finding at `path`.
    pub fn warning(&mut self, path: &Path, message: impl Into<String>) {
        self.findings.entry(path.to_path_buf()).or_default().push(Finding {
            severity: Severity::Warning,
            message: message.into(),
        });
    }

    /// Record a finding at `path` with an explicit severity.
    pub fn record(&mut self, path: &Path, severity: Severity, message: impl Into<String>) {
        match severity {
            Severity::Error => self.error(path, message),
            Severity::Warning => self.warning(path, message),
        }
    }

    /// Mark `path` as visited by at least one node. Also registers the
    /// path in the findings map so printers can show clean entries.
    pub fn touch(&mut self, path: &Path) {
        self.touched.insert(path.to_path_buf());
        self.findings.entry(path.to_path_buf()).or_default();
    }

    pub fn is_touched(&self, path: &Path) -> bool {
        self.touched.contains(path)
    }

    /// All findings in path order, flattened.
    pub fn all_findings(&self) -> impl Iterator<Item = (&Path, &Finding)> {
        self.findings
            .iter()
            .flat_map(|(p, fs)| fs.iter().map(move |f| (p.as_path(), f)))
    }

    /// Fatal findings only, used for pass/fail and idempotence checks.
    pub fn errors(&self) -> impl Iterator<Item = (&Path, &Finding)> {
        self.all_findings()
            .filter(|(_, f)| f.severity == Severity::Error)
    }

    /// A run passes exactly when no fatal finding exists anywhere.
    pub fn passed(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn summary(&self) -> Summary {
        let mut errors = 0usize;
        let mut warnings = 0usize;
        for (_, f) in self.all_findings() {
            match f.severity {
                Severity::Error => errors += 1,
                Severity::Warning => warnings += 1,
            }
        }
        Summary {
            errors,
            warnings,
            touched: self.touched.len(),
        }
    }
}
