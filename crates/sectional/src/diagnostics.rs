// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Diagnostic records returned next to compiled output.
//!
//! Nothing in the compiler is fatal for author input. Conditions a caller may
//! want to surface (an unnamed schema, a loop left unrolled) are reported here
//! instead.

use serde::Serialize;
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Input was capped as configured; the output is complete for what was kept.
    Info,
    /// Something was skipped or degraded.
    Warning,
}

/// What a diagnostic is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The schema parsed but has no `name`.
    MissingSchemaName,
    /// The schema block is not valid JSON.
    MalformedSchema,
    /// A block loop contains another loop and was left as written.
    NestedBlockLoop,
    /// A settings or blocks payload exceeded the byte limit and was dropped.
    PayloadTooLarge,
    /// A key could not be made into a Liquid identifier.
    InvalidIdentifier,
    /// More blocks were supplied than can be unrolled.
    BlocksTruncated,
    /// A product or collection handle was rejected.
    InvalidHandle,
}

/// One diagnostic record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Category.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a warning.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
        }
    }

    /// Creates an informational record.
    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}
