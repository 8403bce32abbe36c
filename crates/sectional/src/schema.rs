// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Schema block extraction and parsing.
//!
//! A section template embeds its configuration as JSON:
//!
//! ```liquid
//! <div>{{ section.settings.heading }}</div>
//! {% schema %}
//! { "name": "Hero", "settings": [ ... ] }
//! {% endschema %}
//! ```
//!
//! Both markers accept whitespace-control dashes (`{%-`, `-%}`). A missing
//! block and a block with malformed JSON are treated the same way by
//! [`parse_schema`]: there is no schema, and the preview renders with an empty
//! configuration.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{Result, SectionalError};
use crate::types::SchemaDefinition;
use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;
use tracing::{debug, warn};

lazy_static! {
    static ref SCHEMA_BLOCK: Regex =
        Regex::new(r"(?is)\{%-?\s*schema\s*-?%\}(.*?)\{%-?\s*endschema\s*-?%\}")
            .expect("schema block pattern");
}

/// Byte ranges of a schema block inside template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaBlockSpan {
    /// The whole block, markers included.
    pub block: Range<usize>,
    /// The JSON interior between the markers.
    pub interior: Range<usize>,
}

/// Locates the first schema block.
pub fn find_schema_block(source: &str) -> Option<SchemaBlockSpan> {
    let caps = SCHEMA_BLOCK.captures(source)?;
    let block = caps.get(0)?.range();
    let interior = caps.get(1)?.range();
    Some(SchemaBlockSpan { block, interior })
}

/// Parses the schema block, reporting malformed JSON as an error.
///
/// Returns `Ok(None)` when the source has no schema block.
pub fn try_parse_schema(source: &str) -> Result<Option<SchemaDefinition>> {
    let Some(span) = find_schema_block(source) else {
        return Ok(None);
    };

    let interior = source[span.interior].trim();
    let schema: SchemaDefinition = serde_json::from_str(interior)
        .map_err(|e| SectionalError::schema_json(&e, interior))?;

    if schema.name.trim().is_empty() {
        warn!("Schema missing required \"name\" field");
    }

    Ok(Some(schema))
}

/// Parses the schema block, failing open.
///
/// Absent and malformed schemas both yield `None`; malformed JSON is logged.
pub fn parse_schema(source: &str) -> Option<SchemaDefinition> {
    match try_parse_schema(source) {
        Ok(schema) => {
            if schema.is_none() {
                debug!("No schema block found");
            }
            schema
        }
        Err(e) => {
            warn!("Failed to parse schema JSON: {}", e);
            None
        }
    }
}

/// Parses the schema and collects soft diagnostics alongside it.
pub fn parse_schema_with_diagnostics(source: &str) -> (Option<SchemaDefinition>, Vec<Diagnostic>) {
    match try_parse_schema(source) {
        Ok(Some(schema)) => {
            let diagnostics = schema_diagnostics(&schema);
            (Some(schema), diagnostics)
        }
        Ok(None) => (None, Vec::new()),
        Err(e) => {
            warn!("Failed to parse schema JSON: {}", e);
            let diagnostic = Diagnostic::warning(DiagnosticKind::MalformedSchema, e.to_string());
            (None, vec![diagnostic])
        }
    }
}

/// Soft warnings for a parsed schema.
pub fn schema_diagnostics(schema: &SchemaDefinition) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if schema.name.trim().is_empty() {
        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::MissingSchemaName,
            "Schema missing required \"name\" field",
        ));
    }
    diagnostics
}

/// Removes every schema block from the source.
pub fn strip_schema(source: &str) -> String {
    SCHEMA_BLOCK.replace_all(source, "").into_owned()
}
