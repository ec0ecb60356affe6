//! Slash-delimited JSON path expressions used by collect-values rules.
//!
//! A path like `/menu/items/*` compiles into steps (object key, array
//! index, or wildcard) and resolves against a parsed JSON value to a set
//! of matching sub-values. Wildcards over arrays fan out one level.

use crate::error::JsonPathError;
use serde_json::Value as Json;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Array index, e.g. `0`.
    Index(usize),
    /// Object field key.
    Key(String),
    /// `*`: flatten each matched array one level.
    Wild,
}

#[derive(Debug, Clone)]
/// A compiled path. Compile once at definition time; resolve per document.
pub struct JsonPath {
    steps: Vec<Step>,
    expr: String,
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Outcome of resolving a path against a document.
pub enum Resolved<'v> {
    /// All matching sub-values, possibly empty.
    Values(Vec<&'v Json>),
    /// A key step named a field absent from a matched object.
    MissingKey(String),
}

impl JsonPath {
    /// Compile a slash-delimited expression. Empty segments are ignored;
    /// an expression with no segments at all is a definition-time error.
    pub fn compile(expr: &str) -> Result<JsonPath, JsonPathError> {
        let steps: Vec<Step> = expr
            .split('/')
            .filter(|seg| !seg.is_empty())
            .map(|seg| {
                if seg == "*" {
                    Step::Wild
                } else if let Ok(ix) = seg.parse::<usize>() {
                    Step::Index(ix)
                } else {
                    Step::Key(seg.to_string())
                }
            })
            .collect();
        if steps.is_empty() {
            return Err(JsonPathError::Empty {
                expr: expr.to_string(),
            });
        }
        Ok(JsonPath {
            steps,
            expr: expr.to_string(),
        })
    }

    pub fn expr(&self) -> &str {
        &self.expr
    }

    /// Resolve against `root`, starting from the singleton set `{root}`.
    ///
    /// Index and wildcard steps require every current value to be an
    /// array; a non-array anywhere collapses the whole resolution to an
    /// empty set. The same holds for key steps over non-objects. A key
    /// absent from a matched object is reported as `MissingKey` rather
    /// than an empty set, so callers can surface it as a distinct fault.
    pub fn resolve<'v>(&self, root: &'v Json) -> Resolved<'v> {
        let mut current: Vec<&'v Json> = vec![root];
        for step in &self.steps {
            let mut next: Vec<&'v Json> = Vec::new();
            match step {
                Step::Index(ix) => {
                    for value in &current {
                        match value {
                            // out-of-range contributes nothing
                            Json::Array(items) => next.extend(items.get(*ix)),
                            _ => return Resolved::Values(Vec::new()),
                        }
                    }
                }
                Step::Key(key) => {
                    for value in &current {
                        match value {
                            Json::Object(map) => match map.get(key) {
                                Some(v) => next.push(v),
                                None => return Resolved::MissingKey(key.clone()),
                            },
                            _ => return Resolved::Values(Vec::new()),
                        }
                    }
                }
                Step::Wild => {
                    for value in &current {
                        match value {
                            Json::Array(items) => next.extend(items.iter()),
                            _ => return Resolved::Values(Vec::new()),
                        }
                    }
                }
            }
            current = next;
        }
        Resolved::Values(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu() -> Json {
        json!({"menu": {"items": [{"id": 1}, {"id": 2}]}})
    }

    fn values<'v>(path: &str, doc: &'v Json) -> Vec<&'v Json> {
        match JsonPath::compile(path).unwrap().resolve(doc) {
            Resolved::Values(v) => v,
            Resolved::MissingKey(k) => panic!("unexpected missing key '{}'", k),
        }
    }

    #[test]
    fn test_compile_rejects_empty() {
        assert!(JsonPath::compile("").is_err());
        assert!(JsonPath::compile("/").is_err());
        assert!(JsonPath::compile("//").is_err());
    }

    #[test]
    fn test_wildcard_fans_out_in_array_order() {
        let doc = menu();
        let got = values("/menu/items/*", &doc);
        assert_eq!(got, vec![&json!({"id": 1}), &json!({"id": 2})]);
    }

    #[test]
    fn test_index_selects_single_element() {
        let doc = menu();
        assert_eq!(values("/menu/items/0", &doc), vec![&json!({"id": 1})]);
        // out of range: nothing matched, but not an error
        assert!(values("/menu/items/9", &doc).is_empty());
    }

    #[test]
    fn test_missing_key_is_distinct_from_empty() {
        let doc = menu();
        let path = JsonPath::compile("/menu/missing").unwrap();
        match path.resolve(&doc) {
            Resolved::MissingKey(k) => assert_eq!(k, "missing"),
            Resolved::Values(_) => panic!("expected missing key"),
        }
    }

    #[test]
    fn test_kind_mismatch_collapses_to_empty() {
        let doc = menu();
        // index step over an object
        assert!(values("/menu/0", &doc).is_empty());
        // key step over an array
        assert!(values("/menu/items/id", &doc).is_empty());
        // wildcard over an object
        assert!(values("/menu/*", &doc).is_empty());
    }

    #[test]
    fn test_leading_slash_is_optional() {
        let doc = menu();
        assert_eq!(values("menu/items/0", &doc), values("/menu/items/0", &doc));
    }
}
