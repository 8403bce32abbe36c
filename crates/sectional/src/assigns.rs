// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Flat assign generation for settings and blocks.
//!
//! The preview interpreter cannot read `section.settings.title` or iterate
//! `section.blocks`, so every value is written to its own variable:
//!
//! ```liquid
//! {% assign settings_title = 'Hello' %}
//! {% assign block_0_id = 'b1' %}
//! {% assign block_0_type = 'slide' %}
//! {% assign block_0_title = 'First' %}
//! {% assign blocks_count = 1 %}
//! ```

use crate::encode::encode_assign;
use crate::resources::ResourceContext;
use crate::sanitize::{is_valid_handle, sanitize_identifier};
use crate::types::{BlockInstance, SettingValue, SettingsState};
use tracing::debug;

/// Statements plus the keys that were dropped while generating them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assigns {
    /// One Liquid statement per entry.
    pub statements: Vec<String>,
    /// Keys or handles rejected by the sanitizer.
    pub rejected: Vec<String>,
}

impl Assigns {
    fn push_settings(&mut self, prefix: &str, settings: &SettingsState) {
        for (key, value) in settings {
            let Some(safe_key) = sanitize_identifier(key) else {
                debug!("Dropping setting with invalid key {:?}", key);
                self.rejected.push(key.clone());
                continue;
            };
            let identifier = format!("{}_{}", prefix, safe_key);
            if let Some(statement) = encode_assign(&identifier, value) {
                self.statements.push(statement);
            }
        }
    }

    fn push_value(&mut self, identifier: &str, value: &str) {
        if let Some(statement) = encode_assign(identifier, &SettingValue::from(value)) {
            self.statements.push(statement);
        }
    }
}

/// Section settings as `settings_<key>` statements, with rejected keys.
pub fn settings_assigns(settings: &SettingsState) -> Assigns {
    let mut assigns = Assigns::default();
    assigns.push_settings("settings", settings);
    assigns
}

/// Section settings as `settings_<key>` statements.
///
/// Keys that fail sanitizing and array/object values are skipped.
pub fn generate_settings_assigns(settings: &SettingsState) -> Vec<String> {
    settings_assigns(settings).statements
}

/// Block statements, with rejected keys.
pub fn blocks_assigns(blocks: &[BlockInstance]) -> Assigns {
    let mut assigns = Assigns::default();

    for (index, block) in blocks.iter().enumerate() {
        let prefix = format!("block_{}", index);
        assigns.push_value(&format!("{}_id", prefix), &block.id);
        assigns.push_value(&format!("{}_type", prefix), &block.block_type);
        assigns.push_settings(&prefix, &block.settings);
    }

    assigns
        .statements
        .push(format!("{{% assign blocks_count = {} %}}", blocks.len()));
    assigns
}

/// Block statements: `block_<i>_id`, `block_<i>_type`, `block_<i>_<key>`, then
/// `blocks_count`.
///
/// `<i>` is the position in `blocks`. `blocks_count` is always emitted, `0`
/// for an empty list.
pub fn generate_blocks_assigns(blocks: &[BlockInstance]) -> Vec<String> {
    blocks_assigns(blocks).statements
}

/// Binds `product` / `collection` to the resources named by handle.
///
/// Handles outside `[A-Za-z0-9-]` are rejected, never interpolated.
pub fn resource_assigns(context: &ResourceContext) -> Assigns {
    let mut assigns = Assigns::default();

    let bindings = [
        ("product", "all_products", context.product_handle.as_deref()),
        ("collection", "collections", context.collection_handle.as_deref()),
    ];
    for (variable, lookup, handle) in bindings {
        let Some(handle) = handle else { continue };
        if is_valid_handle(handle) {
            assigns
                .statements
                .push(format!("{{% assign {} = {}['{}'] %}}", variable, lookup, handle));
        } else {
            debug!("Rejecting {} handle {:?}", variable, handle);
            assigns.rejected.push(handle.to_string());
        }
    }

    assigns
}

/// Resource binding statements only.
pub fn generate_resource_assigns(context: &ResourceContext) -> Vec<String> {
    resource_assigns(context).statements
}
