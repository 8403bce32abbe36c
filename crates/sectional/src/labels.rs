// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Translation-key label resolution.
//!
//! Theme schemas often carry labels like
//! `t:sections.hero.settings.button_text.label` instead of literal text. The
//! preview has no locale files, so the key itself is turned into a readable
//! label: `Button Text`.

use crate::types::{SchemaBlock, SchemaDefinition, SchemaSetting};

/// Sentinel prefix that marks a translation key.
pub const TRANSLATION_PREFIX: &str = "t:";

const STRUCTURAL_SEGMENTS: [&str; 9] = [
    "label",
    "info",
    "placeholder",
    "options",
    "t",
    "sections",
    "blocks",
    "settings",
    "name",
];

fn is_enumerated_option(segment: &str) -> bool {
    segment
        .strip_prefix("options__")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves a label that may be a translation key.
///
/// Plain labels are returned unchanged. For keys, segments are walked from the
/// end, skipping structural words and `options__<n>`; the first remaining
/// segment is converted to Title Case. When nothing survives, the key is
/// returned without its prefix.
///
/// ```
/// use sectional::resolve_translation_key;
///
/// assert_eq!(
///     resolve_translation_key("t:sections.hero.settings.text_alignment.options__2.label"),
///     "Text Alignment"
/// );
/// assert_eq!(resolve_translation_key("Background Color"), "Background Color");
/// ```
pub fn resolve_translation_key(label: &str) -> String {
    let Some(key) = label.strip_prefix(TRANSLATION_PREFIX) else {
        return label.to_string();
    };

    key.split('.')
        .rev()
        .find(|segment| {
            !segment.is_empty()
                && !STRUCTURAL_SEGMENTS.contains(segment)
                && !is_enumerated_option(segment)
        })
        .map(title_case)
        .unwrap_or_else(|| key.to_string())
}

fn resolve_optional(value: Option<String>) -> Option<String> {
    value.map(|v| resolve_translation_key(&v))
}

impl SchemaSetting {
    /// Returns the setting with label, info, placeholder and option labels resolved.
    pub fn resolve_labels(mut self) -> Self {
        self.label = resolve_translation_key(&self.label);
        self.info = resolve_optional(self.info);
        self.placeholder = resolve_optional(self.placeholder);
        for option in &mut self.options {
            option.label = resolve_translation_key(&option.label);
        }
        self
    }
}

impl SchemaBlock {
    /// Returns the block with its name and every setting label resolved.
    pub fn resolve_labels(mut self) -> Self {
        self.name = resolve_translation_key(&self.name);
        self.settings = self
            .settings
            .into_iter()
            .map(SchemaSetting::resolve_labels)
            .collect();
        self
    }
}

impl SchemaDefinition {
    /// Returns the schema with every human-readable string resolved.
    pub fn resolve_labels(mut self) -> Self {
        self.name = resolve_translation_key(&self.name);
        self.settings = self
            .settings
            .into_iter()
            .map(SchemaSetting::resolve_labels)
            .collect();
        self.blocks = self
            .blocks
            .into_iter()
            .map(SchemaBlock::resolve_labels)
            .collect();
        self
    }
}

/// Resolved section settings that carry an id.
pub fn extract_settings(schema: &SchemaDefinition) -> Vec<SchemaSetting> {
    schema
        .settings
        .iter()
        .filter(|s| !s.id.is_empty())
        .cloned()
        .map(SchemaSetting::resolve_labels)
        .collect()
}

/// Resolved block declarations.
pub fn extract_blocks(schema: &SchemaDefinition) -> Vec<SchemaBlock> {
    schema
        .blocks
        .iter()
        .cloned()
        .map(SchemaBlock::resolve_labels)
        .collect()
}
