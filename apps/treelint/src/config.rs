//! Configuration discovery and effective settings resolution.
//!
//! Treelint reads `treelint.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags:
//! - `manifest`: path to the expectation manifest
//!   (default `treelint.manifest.toml`)
//! - `output`: `human|json` (default `human`)
//! - `strict` / `unexpected`: overrides for the manifest's own policy
//! - `schema_dirs`: extra schema search directories
//!
//! Overrides precedence: CLI > config file > manifest > defaults. Strict
//! and unexpected stay `None` here when nobody overrides them, so the
//! manifest's declared policy wins.

use crate::models::Severity;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `treelint.toml|yaml`.
pub struct TreelintConfig {
    pub manifest: Option<String>,
    pub output: Option<String>,
    pub strict: Option<bool>,
    pub unexpected: Option<Severity>,
    #[serde(default)]
    pub schema_dirs: Vec<String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the binary after applying
/// precedence.
pub struct Effective {
    /// The directory that gets linted: exactly what the user named
    /// (or the current dir).
    pub root: PathBuf,
    /// Closest ancestor holding a config file or `.git`; only used for
    /// config and manifest discovery.
    pub repo_root: PathBuf,
    pub manifest: PathBuf,
    pub output: String,
    /// `None` defers to the manifest's `strict` declaration.
    pub strict: Option<bool>,
    /// `None` defers to the manifest's `unexpected` declaration.
    pub unexpected: Option<Severity>,
    /// Searched before the manifest's own schema dirs.
    pub schema_dirs: Vec<PathBuf>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `treelint.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join("treelint.toml").exists()
            || cur.join("treelint.yaml").exists()
            || cur.join("treelint.yml").exists()
        {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `TreelintConfig` from `treelint.toml` or `treelint.yaml|yml` if
/// present.
pub fn load_config(root: &Path) -> Option<TreelintConfig> {
    let toml_path = root.join("treelint.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: TreelintConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["treelint.yaml", "treelint.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: TreelintConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, discovered config, and
/// defaults. Relative paths from the config file are taken relative to
/// the detected repo root; CLI paths are taken as given. The linted
/// root is always `cli_root` itself; config discovery may walk above it
/// but never moves the lint target.
pub fn resolve_effective(
    cli_root: Option<&str>,
    cli_manifest: Option<&str>,
    cli_output: Option<&str>,
    cli_strict: Option<bool>,
    cli_unexpected: Option<Severity>,
    cli_schema_dirs: &[String],
) -> Effective {
    let start = PathBuf::from(cli_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let manifest = match cli_manifest {
        Some(m) => PathBuf::from(m),
        None => repo_root.join(
            cfg.manifest
                .clone()
                .unwrap_or_else(|| "treelint.manifest.toml".to_string()),
        ),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let strict = cli_strict.or(cfg.strict);
    let unexpected = cli_unexpected.or(cfg.unexpected);

    let mut schema_dirs: Vec<PathBuf> = cli_schema_dirs.iter().map(PathBuf::from).collect();
    schema_dirs.extend(cfg.schema_dirs.iter().map(|d| repo_root.join(d)));

    Effective {
        root: start,
        repo_root,
        manifest,
        output,
        strict,
        unexpected,
        schema_dirs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("treelint.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
manifest = "conventions/layout.toml"
output = "json"
strict = false
unexpected = "error"
schema_dirs = ["schemas"]
    "#
        )
        .unwrap();

        // Resolve using explicit root to avoid global CWD races
        let eff = resolve_effective(root.to_str(), None, None, None, None, &[]);
        assert_eq!(eff.manifest, root.join("conventions/layout.toml"));
        assert_eq!(eff.output, "json");
        assert_eq!(eff.strict, Some(false));
        assert_eq!(eff.unexpected, Some(Severity::Error));
        assert_eq!(eff.schema_dirs, vec![root.join("schemas")]);
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("treelint.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
manifest: layout.toml
output: human
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None, None, &[]);
        assert_eq!(eff.manifest, root.join("layout.toml"));
        assert_eq!(eff.output, "human");
        // nobody overrode policy, so the manifest decides
        assert_eq!(eff.strict, None);
        assert_eq!(eff.unexpected, None);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("treelint.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
manifest = "from-config.toml"
output = "human"
strict = true
"#
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("from-cli.toml"),
            Some("json"),
            Some(false),
            Some(Severity::Error),
            &["cli-schemas".to_string()],
        );
        assert_eq!(eff.manifest, PathBuf::from("from-cli.toml"));
        assert_eq!(eff.output, "json");
        assert_eq!(eff.strict, Some(false));
        assert_eq!(eff.unexpected, Some(Severity::Error));
        assert_eq!(eff.schema_dirs[0], PathBuf::from("cli-schemas"));
    }

    #[test]
    fn test_subdirectory_root_is_linted_not_the_ancestor() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("treelint.toml")).unwrap();
        writeln!(f, "{}", r#"manifest = "layout.toml""#).unwrap();
        let sub = root.join("services/api");
        fs::create_dir_all(&sub).unwrap();

        let eff = resolve_effective(sub.to_str(), None, None, None, None, &[]);
        // config still comes from the ancestor...
        assert_eq!(eff.repo_root, root);
        assert_eq!(eff.manifest, root.join("layout.toml"));
        // ...but the lint target stays where the user pointed it
        assert_eq!(eff.root, sub);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let eff = resolve_effective(root.to_str(), None, None, None, None, &[]);
        assert_eq!(eff.manifest, root.join("treelint.manifest.toml"));
        assert_eq!(eff.output, "human");
        assert!(eff.schema_dirs.is_empty());
    }
}
