//! The lint-node tree and its evaluation.
//!
//! A node consumes a `LintContext` and contributes findings to the run
//! state; nodes never return values. The tree is walked depth-first in
//! declared order, and evaluation always continues past a recorded error
//! so one run surfaces every finding it can.

use crate::context::{LintContext, RunState};
use crate::jsonpath::{JsonPath, Resolved};
use crate::schema;
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Token replaced by the absolute path of the linted file in shell
/// command lines.
pub const PATH_PLACEHOLDER: &str = "%s";

/// Host-supplied predicate for `LintNode::Check`. `Err` carries a
/// description of the failure; `Ok(())` means no opinion.
pub type CheckFn = Box<dyn Fn(&LintContext) -> Result<(), String>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Min/max bounds on the number of glob matches. Each bound is checked
/// independently, so a count can violate both at once.
pub struct MatchBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

impl MatchBounds {
    pub fn none() -> MatchBounds {
        MatchBounds::default()
    }

    pub fn at_least(min: usize) -> MatchBounds {
        MatchBounds {
            min: Some(min),
            max: None,
        }
    }

    fn check(&self, pattern: &str, count: usize, at: &Path, run: &mut RunState) {
        if let Some(min) = self.min {
            if count < min {
                run.report.error(
                    at,
                    format!(
                        "'{}' should have had at least {} matches but it had {} matches",
                        pattern, min, count
                    ),
                );
            }
        }
        if let Some(max) = self.max {
            if count > max {
                run.report.error(
                    at,
                    format!(
                        "'{}' should have had at most {} matches but it had {} matches",
                        pattern, max, count
                    ),
                );
            }
        }
    }
}

/// A unit of the declarative expectation tree.
pub enum LintNode {
    /// A named subdirectory that must (or may) exist; children run
    /// against it.
    Directory {
        path: String,
        optional: bool,
        children: Vec<LintNode>,
    },
    /// A named file that must (or may) exist; children run against it.
    File {
        path: String,
        optional: bool,
        children: Vec<LintNode>,
    },
    /// Files matching a glob under the current directory; children run
    /// against each match.
    Files {
        pattern: String,
        bounds: MatchBounds,
        children: Vec<LintNode>,
    },
    /// Directories matching a glob under the current directory.
    Directories {
        pattern: String,
        bounds: MatchBounds,
        children: Vec<LintNode>,
    },
    /// Parse the current file as JSON and apply JSON rules to it.
    JsonContent { rules: Vec<JsonRule> },
    /// Run an external command against the current file. `%s` tokens are
    /// substituted with the file's absolute path.
    ShellCommand { command: Vec<String> },
    /// An arbitrary named predicate over the current context.
    Check { name: String, func: CheckFn },
}

/// A rule applied to an already-parsed JSON document.
pub enum JsonRule {
    /// Validate the document against a JSON Schema file.
    FollowsSchema { schema: String },
    /// Extract values by JSON path into the property store.
    CollectValues {
        path: JsonPath,
        group: String,
        key: String,
        optional: bool,
    },
}

pub fn directory(path: &str, optional: bool, children: Vec<LintNode>) -> LintNode {
    LintNode::Directory {
        path: path.to_string(),
        optional,
        children,
    }
}

pub fn file(path: &str, optional: bool, children: Vec<LintNode>) -> LintNode {
    LintNode::File {
        path: path.to_string(),
        optional,
        children,
    }
}

pub fn files(pattern: &str, bounds: MatchBounds, children: Vec<LintNode>) -> LintNode {
    LintNode::Files {
        pattern: pattern.to_string(),
        bounds,
        children,
    }
}

pub fn directories(pattern: &str, bounds: MatchBounds, children: Vec<LintNode>) -> LintNode {
    LintNode::Directories {
        pattern: pattern.to_string(),
        bounds,
        children,
    }
}

pub fn json_content(rules: Vec<JsonRule>) -> LintNode {
    LintNode::JsonContent { rules }
}

pub fn shell_command<T: Into<String>>(command: Vec<T>) -> LintNode {
    LintNode::ShellCommand {
        command: command.into_iter().map(Into::into).collect(),
    }
}

pub fn check(
    name: &str,
    func: impl Fn(&LintContext) -> Result<(), String> + 'static,
) -> LintNode {
    LintNode::Check {
        name: name.to_string(),
        func: Box::new(func),
    }
}

pub fn follows_schema(schema: &str) -> JsonRule {
    JsonRule::FollowsSchema {
        schema: schema.to_string(),
    }
}

pub fn collect_values(path: JsonPath, group: &str, key: &str, optional: bool) -> JsonRule {
    JsonRule::CollectValues {
        path,
        group: group.to_string(),
        key: key.to_string(),
        optional,
    }
}

impl LintNode {
    /// Evaluate this node against `ctx`, recording findings in `run`.
    pub fn lint(&self, ctx: &LintContext, run: &mut RunState) {
        match self {
            LintNode::Directory {
                path,
                optional,
                children,
            } => match ctx.cd(path) {
                None => {
                    if !optional {
                        run.report.error(
                            ctx.path(),
                            format!("required directory '{}' does not exist", path),
                        );
                    }
                }
                Some(sub) => {
                    run.report.touch(sub.path());
                    for child in children {
                        child.lint(&sub, run);
                    }
                }
            },

            LintNode::File {
                path,
                optional,
                children,
            } => match ctx.with_filename(path) {
                None => {
                    if !optional {
                        run.report.error(
                            ctx.path(),
                            format!("required file '{}' does not exist", path),
                        );
                    }
                }
                Some(sub) => {
                    run.report.touch(sub.path());
                    for child in children {
                        child.lint(&sub, run);
                    }
                }
            },

            LintNode::Files {
                pattern,
                bounds,
                children,
            } => {
                if let Some(matches) = glob_matches(ctx.path(), pattern, false, run) {
                    bounds.check(pattern, matches.len(), ctx.path(), run);
                    for m in &matches {
                        // enumeration just returned the path; the guard
                        // only fires if it vanished in between
                        if let Some(sub) = LintContext::for_file(m) {
                            run.report.touch(sub.path());
                            for child in children {
                                child.lint(&sub, run);
                            }
                        }
                    }
                }
            }

            LintNode::Directories {
                pattern,
                bounds,
                children,
            } => {
                if let Some(matches) = glob_matches(ctx.path(), pattern, true, run) {
                    bounds.check(pattern, matches.len(), ctx.path(), run);
                    for m in &matches {
                        if let Some(sub) = LintContext::for_dir(m) {
                            run.report.touch(sub.path());
                            for child in children {
                                child.lint(&sub, run);
                            }
                        }
                    }
                }
            }

            LintNode::JsonContent { rules } => {
                if !ctx.path().is_file() {
                    run.report.error(
                        ctx.path(),
                        "JSON content can only be checked for files",
                    );
                    return;
                }
                let text = match fs::read_to_string(ctx.path()) {
                    Ok(t) => t,
                    Err(e) => {
                        run.report
                            .error(ctx.path(), format!("could not read file: {}", e));
                        return;
                    }
                };
                match serde_json::from_str::<Json>(&text) {
                    Err(e) => {
                        // serde_json's message carries line/column
                        run.report
                            .error(ctx.path(), format!("malformed JSON: {}", e));
                    }
                    Ok(doc) => {
                        for rule in rules {
                            rule.lint(&doc, ctx, run);
                        }
                    }
                }
            }

            LintNode::ShellCommand { command } => {
                if !ctx.path().is_file() {
                    run.report.error(
                        ctx.path(),
                        format!("'{}' is not a file", ctx.path().display()),
                    );
                    return;
                }
                if command.is_empty() {
                    run.report.error(ctx.path(), "shell command has no tokens");
                    return;
                }
                let target = ctx.path().to_string_lossy();
                let argv: Vec<String> = command
                    .iter()
                    .map(|tok| tok.replace(PATH_PLACEHOLDER, &target))
                    .collect();
                match Command::new(&argv[0]).args(&argv[1..]).output() {
                    Err(e) => {
                        run.report.error(
                            ctx.path(),
                            format!("could not launch '{}': {}", argv[0], e),
                        );
                    }
                    Ok(out) => {
                        if !out.status.success() {
                            let code = out
                                .status
                                .code()
                                .map(|c| c.to_string())
                                .unwrap_or_else(|| "killed by signal".to_string());
                            run.report.error(
                                ctx.path(),
                                format!(
                                    "non-zero return code ({}) from '{}'. Output: {}",
                                    code,
                                    argv.join(" "),
                                    String::from_utf8_lossy(&out.stderr)
                                ),
                            );
                        }
                    }
                }
            }

            LintNode::Check { name, func } => {
                if let Err(msg) = func(ctx) {
                    run.report
                        .error(ctx.path(), format!("check '{}' failed: {}", name, msg));
                }
            }
        }
    }
}

impl JsonRule {
    /// Apply this rule to a parsed JSON document.
    pub fn lint(&self, doc: &Json, ctx: &LintContext, run: &mut RunState) {
        match self {
            JsonRule::FollowsSchema { schema } => {
                let resolved = match schema::resolve_schema(schema, run.schema_dirs) {
                    Ok(p) => p,
                    Err(tried) => {
                        let tried: Vec<String> =
                            tried.iter().map(|p| p.display().to_string()).collect();
                        run.report.error(
                            ctx.path(),
                            format!(
                                "could not find JSON schema '{}'; tried: [{}]",
                                schema,
                                tried.join(", ")
                            ),
                        );
                        return;
                    }
                };
                let outcome = match run.schema_cache.get_or_load(&resolved) {
                    Ok(schema_doc) => schema::validate(schema_doc, doc),
                    Err(e) => {
                        run.report.error(ctx.path(), e.to_string());
                        return;
                    }
                };
                match outcome {
                    Err(e) => {
                        run.report
                            .error(ctx.path(), format!("{}: {}", resolved.display(), e));
                    }
                    Ok(violations) => {
                        for v in violations {
                            run.report.error(ctx.path(), v);
                        }
                    }
                }
            }

            JsonRule::CollectValues {
                path,
                group,
                key,
                optional,
            } => match path.resolve(doc) {
                Resolved::MissingKey(k) => {
                    run.report.error(
                        ctx.path(),
                        format!("could not find key '{}' in JSON path '{}'", k, path),
                    );
                }
                Resolved::Values(values) => {
                    if values.is_empty() && !optional {
                        run.report.error(
                            ctx.path(),
                            format!("no values matched JSON path '{}'", path),
                        );
                    }
                    for v in values {
                        run.report.properties.append(group, key, v.clone());
                    }
                }
            },
        }
    }
}

/// Enumerate glob matches of the requested kind under `base`. A pattern
/// that fails to compile records a fatal finding and yields `None`.
fn glob_matches(
    base: &Path,
    pattern: &str,
    want_dirs: bool,
    run: &mut RunState,
) -> Option<Vec<PathBuf>> {
    let full = base.join(pattern);
    let paths = match glob::glob(&full.to_string_lossy()) {
        Ok(p) => p,
        Err(e) => {
            run.report
                .error(base, format!("invalid glob pattern '{}': {}", pattern, e));
            return None;
        }
    };
    let mut out = Vec::new();
    for entry in paths.flatten() {
        let keep = if want_dirs {
            entry.is_dir()
        } else {
            entry.is_file()
        };
        if keep {
            out.push(entry);
        }
    }
    Some(out)
}
