//! Output rendering for lint reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-path findings, collected properties, and a top-level summary.

use crate::models::{RunReport, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print a lint report in the requested format.
pub fn print_report(report: &RunReport, output: &str, properties: bool) {
    match output {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&compose_lint_json(report, properties))
                .unwrap_or_else(|_| "{}".to_string())
        ),
        _ => {
            let color = use_colors(output);
            for (path, finding) in report.all_findings() {
                let sev = match finding.severity {
                    Severity::Error => {
                        if color {
                            "⟦error⟧".red().bold().to_string()
                        } else {
                            "⟦error⟧".to_string()
                        }
                    }
                    Severity::Warning => {
                        if color {
                            "⟦warn⟧".yellow().bold().to_string()
                        } else {
                            "⟦warn⟧".to_string()
                        }
                    }
                };
                let icon = match finding.severity {
                    Severity::Error => {
                        if color {
                            "✖".red().to_string()
                        } else {
                            "✖".to_string()
                        }
                    }
                    Severity::Warning => {
                        if color {
                            "▲".yellow().to_string()
                        } else {
                            "▲".to_string()
                        }
                    }
                };
                let shown = path.display().to_string();
                let shown = if color {
                    shown.bold().to_string()
                } else {
                    shown
                };
                println!("{} {} {} — {}", icon, sev, shown, finding.message);
            }
            if properties && !report.properties.is_empty() {
                for (group, keys) in report.properties.iter() {
                    for (key, values) in keys {
                        let header = format!("{}.{} ({} values):", group, key, values.len());
                        if color {
                            println!("{}", header.bold());
                        } else {
                            println!("{}", header);
                        }
                        for v in values {
                            println!("  {}", v);
                        }
                    }
                }
            }
            let s = report.summary();
            let summary = format!(
                "— Summary — errors={} warnings={} touched={}",
                s.errors, s.warnings, s.touched
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Compose the lint JSON object (pure) for testing/snapshot purposes.
pub fn compose_lint_json(report: &RunReport, properties: bool) -> JsonVal {
    let results: Vec<JsonVal> = report
        .findings
        .iter()
        .map(|(path, findings)| {
            json!({
                "path": path.display().to_string(),
                "findings": findings,
            })
        })
        .collect();
    let s = report.summary();
    let mut out = json!({
        "results": results,
        "summary": {
            "errors": s.errors,
            "warnings": s.warnings,
            "touched": s.touched,
            "passed": report.passed(),
        },
    });
    if properties {
        if let (Some(map), Ok(props)) = (
            out.as_object_mut(),
            serde_json::to_value(&report.properties),
        ) {
            map.insert("properties".to_string(), props);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn sample() -> RunReport {
        let mut report = RunReport::default();
        report.touch(Path::new("/r/a.txt"));
        report.error(Path::new("/r/a.txt"), "boom");
        report.warning(Path::new("/r"), "unexpected file '/r/b.txt'");
        report.properties.append("menu", "items", json!({"id": 1}));
        report
    }

    #[test]
    fn test_compose_lint_json_shape() {
        let out = compose_lint_json(&sample(), false);
        assert_eq!(out["summary"]["errors"], 1);
        assert_eq!(out["summary"]["warnings"], 1);
        assert_eq!(out["summary"]["passed"], false);
        assert!(out.get("properties").is_none());
        // path order is deterministic: "/r" sorts before "/r/a.txt"
        assert_eq!(out["results"][0]["path"], "/r");
        assert_eq!(out["results"][1]["findings"][0]["severity"], "error");
        assert_eq!(out["results"][1]["findings"][0]["message"], "boom");
    }

    #[test]
    fn test_compose_lint_json_with_properties() {
        let out = compose_lint_json(&sample(), true);
        assert_eq!(out["properties"]["menu"]["items"][0]["id"], 1);
    }

    #[test]
    fn test_touched_path_appears_with_empty_findings() {
        let mut report = RunReport::default();
        report.touch(Path::new("/r/clean.txt"));
        let out = compose_lint_json(&report, false);
        assert_eq!(out["results"][0]["path"], "/r/clean.txt");
        assert_eq!(out["results"][0]["findings"], json!([]));
        assert_eq!(out["summary"]["passed"], true);
    }
}
