// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Value encoding into Liquid assign statements.
//!
//! Liquid string literals have no escape sequences, so a value is never
//! escaped. Instead the encoder picks the quote character the value does not
//! contain, and falls back to a `capture` block when it contains both.
//!
//! | value | statement |
//! |---|---|
//! | nil, `""` | `{% assign x = nil %}` |
//! | number, bool | `{% assign x = 3 %}` |
//! | no quotes | `{% assign x = 'v' %}` |
//! | only `'` | `{% assign x = "v" %}` |
//! | only `"` | `{% assign x = 'v' %}` |
//! | both, or a tag delimiter | `{% capture x %}v{% endcapture %}` |
//!
//! Inside a capture every `{{`, `{%`, `%}` and `}}` is split with a space so
//! the value can never reopen template evaluation.

use crate::types::{format_number, SettingValue};

/// How a string value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `'value'`
    Single,
    /// `"value"`
    Double,
    /// `{% capture %}value{% endcapture %}`
    Capture,
}

const DELIMITERS: [&str; 4] = ["{{", "{%", "%}", "}}"];

/// Picks the quoting strategy for a string value.
pub fn quote_style(value: &str) -> QuoteStyle {
    let has_single = value.contains('\'');
    let has_double = value.contains('"');

    if DELIMITERS.iter().any(|d| value.contains(d)) {
        return QuoteStyle::Capture;
    }

    match (has_single, has_double) {
        (true, true) => QuoteStyle::Capture,
        (true, false) => QuoteStyle::Double,
        _ => QuoteStyle::Single,
    }
}

/// Splits every two-character Liquid delimiter with a space.
///
/// Works on overlapping runs too: `{{{` becomes `{ { {`.
pub fn defang_delimiters(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    let mut chars = value.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        let next = chars.peek().copied();
        let split = match (c, next) {
            ('{', Some('{')) | ('{', Some('%')) => true,
            ('%', Some('}')) | ('}', Some('}')) => true,
            _ => false,
        };
        if split {
            out.push(' ');
        }
    }

    out
}

/// Renders `identifier = value` as a Liquid statement.
///
/// `identifier` must already be a valid Liquid variable name. Returns `None`
/// for array and object values, which a flat assign cannot express.
pub fn encode_assign(identifier: &str, value: &SettingValue) -> Option<String> {
    let statement = match value {
        SettingValue::Nil => nil_assign(identifier),
        SettingValue::Bool(b) => format!("{{% assign {} = {} %}}", identifier, b),
        SettingValue::Number(n) if n.is_finite() => {
            format!("{{% assign {} = {} %}}", identifier, format_number(*n))
        }
        SettingValue::Number(_) => nil_assign(identifier),
        SettingValue::String(s) if s.is_empty() => nil_assign(identifier),
        SettingValue::String(s) => encode_string(identifier, s),
        SettingValue::Unsupported(_) => return None,
    };
    Some(statement)
}

fn nil_assign(identifier: &str) -> String {
    format!("{{% assign {} = nil %}}", identifier)
}

fn encode_string(identifier: &str, value: &str) -> String {
    match quote_style(value) {
        QuoteStyle::Single => format!("{{% assign {} = '{}' %}}", identifier, value),
        QuoteStyle::Double => format!("{{% assign {} = \"{}\" %}}", identifier, value),
        QuoteStyle::Capture => format!(
            "{{% capture {} %}}{}{{% endcapture %}}",
            identifier,
            defang_delimiters(value)
        ),
    }
}
