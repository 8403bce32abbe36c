// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Error types for the sectional compiler.
//!
//! Almost every transformation in this crate fails open: author mistakes
//! degrade to "no schema" or a dropped statement, never to an error. The
//! [`SectionalError`] enum is only returned by the `try_*` entry points and by
//! the I/O-facing helpers used by the CLI.
//!
//! # Source Context
//!
//! Schema JSON errors carry a [`SourceContext`] pointing into the schema
//! block so tooling can show the offending line with a caret.

use std::fmt;
use thiserror::Error;

/// The lines of a schema block around a JSON parse failure.
///
/// Only the window around the failing line is kept, not the whole schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    /// `(line number, text)` pairs, 1-indexed, in order.
    pub window: Vec<(usize, String)>,
    /// Failing line within the schema interior.
    pub line: usize,
    /// Failing column within that line.
    pub column: usize,
}

impl SourceContext {
    /// Lines kept on each side of the failing line.
    const RADIUS: usize = 2;

    /// Cuts the window around `line` out of the schema interior.
    pub fn from_source(interior: &str, line: usize, column: usize) -> Self {
        let first = line.saturating_sub(Self::RADIUS).max(1);
        let window = interior
            .lines()
            .enumerate()
            .map(|(i, text)| (i + 1, text.to_string()))
            .skip(first - 1)
            .take(line + Self::RADIUS + 1 - first)
            .collect();
        Self { window, line, column }
    }

    /// Numbered lines with a caret under the failing column.
    ///
    /// ```text
    ///    2 |   "name": "Hero",
    ///    3 |   "settings": [
    ///      |               ^
    /// ```
    pub fn format_snippet(&self) -> String {
        let mut out = String::new();
        for (number, text) in &self.window {
            out.push_str(&format!("{:4} | {}\n", number, text));
            if *number == self.line {
                out.push_str(&format!("     | {}^\n", " ".repeat(self.column.saturating_sub(1))));
            }
        }
        out
    }
}

impl fmt::Display for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_snippet())
    }
}

/// Errors produced by the fallible entry points of this crate.
#[derive(Error, Debug)]
pub enum SectionalError {
    /// The schema block was found but its interior is not valid JSON.
    #[error("Schema JSON error: {message} at line {line}, column {column}\n{source_context}")]
    SchemaJson {
        /// Description from the JSON parser.
        message: String,
        /// Line within the schema interior (1-indexed).
        line: usize,
        /// Column within the schema interior (1-indexed).
        column: usize,
        /// Snippet around the failure.
        source_context: SourceContext,
    },

    /// A settings or blocks payload could not be decoded.
    #[error("Payload error: {0}")]
    Payload(String),

    /// The payload exceeded the configured byte threshold.
    #[error("Payload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid compile options.
    #[error("Config error: {0}")]
    Config(String),
}

impl SectionalError {
    /// Builds a [`SectionalError::SchemaJson`] from a serde_json error and the
    /// schema interior it was raised for.
    pub fn schema_json(err: &serde_json::Error, interior: &str) -> Self {
        let line = err.line().max(1);
        let column = err.column().max(1);
        SectionalError::SchemaJson {
            message: err.to_string(),
            line,
            column,
            source_context: SourceContext::from_source(interior, line, column),
        }
    }
}

/// Convenience type alias for Results with [`SectionalError`].
pub type Result<T> = std::result::Result<T, SectionalError>;
