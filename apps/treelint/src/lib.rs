//! Treelint core library.
//!
//! This crate exposes programmatic APIs for linting a directory tree
//! against a declarative tree of expectations: required files and
//! directories, glob-bounded collections, shell checks, and
//! schema-validated JSON content.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `manifest`: TOML manifest describing the expectation tree.
//! - `node`: The lint-node tree and its evaluation.
//! - `lint`: The orchestrator, including strict-contents detection.
//! - `context`: Per-node path context and shared run state.
//! - `jsonpath`: Slash-delimited JSON path matching.
//! - `schema`: JSON Schema resolution, caching, and validation.
//! - `models`: Findings, reports, summaries, collected properties.
//! - `output`: Human/JSON printers.
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod jsonpath;
pub mod lint;
pub mod manifest;
pub mod models;
pub mod node;
pub mod output;
pub mod schema;
