//! Manifest schema: the TOML surface that declares an expectation tree.
//!
//! One producer of the in-memory node tree; hosts embedding the library
//! can assemble nodes directly instead (and `Check` nodes, which carry
//! closures, are API-only). JSON paths compile at load time so a bad
//! expression never reaches a lint run.
//!
//! ```toml
//! strict = true
//! unexpected = "warning"
//! schema_dirs = ["schemas"]
//!
//! [[entry]]
//! kind = "directory"
//! path = "sample_data"
//!
//!   [[entry.children]]
//!   kind = "files"
//!   glob = "*.json"
//!   min = 1
//!
//!     [[entry.children.children]]
//!     kind = "json"
//!
//!       [[entry.children.children.rules]]
//!       rule = "follows_schema"
//!       schema = "menu.schema.json"
//! ```

use crate::error::ManifestError;
use crate::jsonpath::JsonPath;
use crate::lint::Linter;
use crate::models::Severity;
use crate::node::{self, LintNode, MatchBounds};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
/// Top-level manifest document.
pub struct Manifest {
    #[serde(default = "default_strict")]
    pub strict: bool,
    #[serde(default = "default_unexpected")]
    pub unexpected: Severity,
    #[serde(default)]
    pub schema_dirs: Vec<String>,
    #[serde(default, rename = "entry")]
    pub entries: Vec<EntryDecl>,
}

fn default_strict() -> bool {
    true
}

fn default_unexpected() -> Severity {
    Severity::Warning
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// One declared expectation. Mirrors the node variants expressible
/// without host code.
pub enum EntryDecl {
    Directory {
        path: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        children: Vec<EntryDecl>,
    },
    File {
        path: String,
        #[serde(default)]
        optional: bool,
        #[serde(default)]
        children: Vec<EntryDecl>,
    },
    Files {
        glob: String,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        children: Vec<EntryDecl>,
    },
    Directories {
        glob: String,
        #[serde(default)]
        min: Option<usize>,
        #[serde(default)]
        max: Option<usize>,
        #[serde(default)]
        children: Vec<EntryDecl>,
    },
    Json {
        #[serde(default)]
        rules: Vec<RuleDecl>,
    },
    Shell {
        command: Vec<String>,
    },
}

#[derive(Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
/// JSON rules expressible in the manifest.
pub enum RuleDecl {
    FollowsSchema {
        schema: String,
    },
    CollectValues {
        path: String,
        group: String,
        key: String,
        #[serde(default)]
        optional: bool,
    },
}

impl Manifest {
    /// Load and parse a manifest file.
    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Manifest::parse(&text).map_err(|e| match e {
            ManifestError::Parse { reason, .. } => ManifestError::Parse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })
    }

    /// Parse manifest TOML from a string.
    pub fn parse(text: &str) -> Result<Manifest, ManifestError> {
        toml::from_str(text).map_err(|e| ManifestError::Parse {
            path: PathBuf::new(),
            reason: e.to_string(),
        })
    }

    /// Build a linter from this manifest. `extra_schema_dirs` (for
    /// example from CLI flags) are searched before the manifest's own.
    pub fn into_linter(self, extra_schema_dirs: Vec<PathBuf>) -> Result<Linter, ManifestError> {
        let mut dirs = extra_schema_dirs;
        dirs.extend(self.schema_dirs.iter().map(PathBuf::from));
        let nodes = self
            .entries
            .into_iter()
            .map(EntryDecl::into_node)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Linter::new(nodes)
            .strict_directory_contents(self.strict)
            .unexpected_level(self.unexpected)
            .schema_dirs(dirs))
    }
}

impl EntryDecl {
    fn into_node(self) -> Result<LintNode, ManifestError> {
        Ok(match self {
            EntryDecl::Directory {
                path,
                optional,
                children,
            } => LintNode::Directory {
                path,
                optional,
                children: into_nodes(children)?,
            },
            EntryDecl::File {
                path,
                optional,
                children,
            } => LintNode::File {
                path,
                optional,
                children: into_nodes(children)?,
            },
            EntryDecl::Files {
                glob,
                min,
                max,
                children,
            } => LintNode::Files {
                pattern: glob,
                bounds: MatchBounds { min, max },
                children: into_nodes(children)?,
            },
            EntryDecl::Directories {
                glob,
                min,
                max,
                children,
            } => LintNode::Directories {
                pattern: glob,
                bounds: MatchBounds { min, max },
                children: into_nodes(children)?,
            },
            EntryDecl::Json { rules } => LintNode::JsonContent {
                rules: rules
                    .into_iter()
                    .map(RuleDecl::into_rule)
                    .collect::<Result<Vec<_>, _>>()?,
            },
            EntryDecl::Shell { command } => LintNode::ShellCommand { command },
        })
    }
}

impl RuleDecl {
    fn into_rule(self) -> Result<node::JsonRule, ManifestError> {
        Ok(match self {
            RuleDecl::FollowsSchema { schema } => node::JsonRule::FollowsSchema { schema },
            RuleDecl::CollectValues {
                path,
                group,
                key,
                optional,
            } => node::JsonRule::CollectValues {
                path: JsonPath::compile(&path)?,
                group,
                key,
                optional,
            },
        })
    }
}

fn into_nodes(decls: Vec<EntryDecl>) -> Result<Vec<LintNode>, ManifestError> {
    decls.into_iter().map(EntryDecl::into_node).collect()
}
