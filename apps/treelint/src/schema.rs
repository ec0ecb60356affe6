//! JSON Schema loading and validation glue.
//!
//! Schema filenames resolve against the current working directory and a
//! configurable ordered list of search directories. Parsed schema
//! documents are cached per resolved path: one parse per path for the
//! cache's lifetime, and malformed files are never cached so a later fix
//! is picked up by a fresh cache.

use serde_json::Value as Json;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaLoadError {
    #[error("could not read JSON schema file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in schema file '{path}': {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse-once cache of schema documents, keyed by resolved absolute path.
#[derive(Debug, Default)]
pub struct SchemaCache {
    entries: HashMap<PathBuf, Json>,
    loads: usize,
}

impl SchemaCache {
    pub fn new() -> SchemaCache {
        SchemaCache::default()
    }

    /// Number of successful disk loads so far. Lets tests assert the
    /// at-most-once-per-path policy.
    pub fn loads(&self) -> usize {
        self.loads
    }

    /// Fetch the parsed schema at `path`, reading and parsing it on the
    /// first request only. Failed reads and parses leave the cache
    /// untouched.
    pub fn get_or_load(&mut self, path: &Path) -> Result<&Json, SchemaLoadError> {
        match self.entries.entry(path.to_path_buf()) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let text = fs::read_to_string(path).map_err(|source| SchemaLoadError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                let doc: Json =
                    serde_json::from_str(&text).map_err(|source| SchemaLoadError::Malformed {
                        path: path.to_path_buf(),
                        source,
                    })?;
                self.loads += 1;
                Ok(e.insert(doc))
            }
        }
    }
}

/// Resolve a schema filename to an existing regular file.
///
/// Tries, in order: the filename as given when absolute; the current
/// working directory; each configured search directory. On failure
/// returns every candidate tried, for the error message.
pub fn resolve_schema(filename: &str, search_dirs: &[PathBuf]) -> Result<PathBuf, Vec<PathBuf>> {
    let given = PathBuf::from(filename);
    let mut candidates: Vec<PathBuf> = Vec::new();
    if given.is_absolute() {
        candidates.push(given);
    } else {
        if let Ok(cwd) = std::env::current_dir() {
            candidates.push(cwd.join(filename));
        }
        for dir in search_dirs {
            candidates.push(dir.join(filename));
        }
    }
    for cand in &candidates {
        if cand.is_file() {
            return Ok(cand.clone());
        }
    }
    Err(candidates)
}

/// Validate `instance` against `schema`.
///
/// `Err` means the schema document itself does not compile; `Ok` carries
/// one message per validation violation, each echoing the offending JSON
/// fragment, and is empty for a conforming instance.
pub fn validate(schema: &Json, instance: &Json) -> Result<Vec<String>, String> {
    let validator =
        jsonschema::validator_for(schema).map_err(|e| format!("invalid JSON schema: {}", e))?;
    Ok(validator
        .iter_errors(instance)
        .map(|e| format!("{} JSON: {}", e, e.instance))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_cache_loads_each_path_once() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("menu.schema.json");
        fs::write(&p, br#"{"type": "object"}"#).unwrap();

        let mut cache = SchemaCache::new();
        cache.get_or_load(&p).unwrap();
        cache.get_or_load(&p).unwrap();
        cache.get_or_load(&p).unwrap();
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn test_malformed_schema_is_not_cached() {
        let tmp = tempdir().unwrap();
        let p = tmp.path().join("bad.schema.json");
        fs::write(&p, b"{ not json").unwrap();

        let mut cache = SchemaCache::new();
        let err = cache.get_or_load(&p).unwrap_err();
        assert!(err.to_string().contains("malformed JSON"));
        assert_eq!(cache.loads(), 0);

        // fixing the file on disk is observed because nothing was cached
        fs::write(&p, b"{}").unwrap();
        assert!(cache.get_or_load(&p).is_ok());
        assert_eq!(cache.loads(), 1);
    }

    #[test]
    fn test_resolve_prefers_earlier_search_dirs() {
        let tmp = tempdir().unwrap();
        let first = tmp.path().join("first");
        let second = tmp.path().join("second");
        fs::create_dir_all(&first).unwrap();
        fs::create_dir_all(&second).unwrap();
        fs::write(second.join("m.json"), b"{}").unwrap();

        let dirs = vec![first.clone(), second.clone()];
        // only in `second`
        assert_eq!(resolve_schema("m.json", &dirs).unwrap(), second.join("m.json"));
        // once present in `first`, it wins
        fs::write(first.join("m.json"), b"{}").unwrap();
        assert_eq!(resolve_schema("m.json", &dirs).unwrap(), first.join("m.json"));
    }

    #[test]
    fn test_resolve_absolute_and_missing() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("s.json");
        fs::write(&abs, b"{}").unwrap();
        assert_eq!(
            resolve_schema(abs.to_str().unwrap(), &[]).unwrap(),
            abs
        );

        let tried = resolve_schema("nope.json", &[tmp.path().to_path_buf()]).unwrap_err();
        assert!(tried.iter().any(|c| c == &tmp.path().join("nope.json")));
    }

    #[test]
    fn test_validate_reports_fragment() {
        let schema = json!({
            "type": "object",
            "properties": {
                "menu": {
                    "type": "object",
                    "properties": {"items": {"type": "array", "minItems": 1}},
                    "required": ["items"]
                }
            },
            "required": ["menu"]
        });
        let instance = json!({"menu": {"items": []}});
        let violations = validate(&schema, &instance).unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("[]"), "fragment echoed: {}", violations[0]);

        let ok = validate(&schema, &json!({"menu": {"items": [1]}})).unwrap();
        assert!(ok.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_schema_document() {
        // "type" must be a string or array of strings; 42 cannot compile
        let schema = json!({"type": 42});
        assert!(validate(&schema, &json!({})).is_err());
    }
}
