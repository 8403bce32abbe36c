// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Writing edited values back into a template's schema as new defaults.

use crate::schema::find_schema_block;
use crate::types::{SettingType, SettingsState};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Result of [`update_schema_defaults_with_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDefaultsUpdate {
    /// The template source, rewritten or as given.
    pub code: String,
    /// Ids of resource settings whose values were not written.
    pub unsupported_settings: Vec<String>,
}

/// Sets `default` on each top-level schema setting named in `values`.
///
/// See [`update_schema_defaults_with_report`].
pub fn update_schema_defaults(source: &str, values: &SettingsState) -> String {
    update_schema_defaults_with_report(source, values).code
}

/// Sets `default` on each top-level schema setting named in `values` and
/// reports the settings that cannot take one.
///
/// Resource settings (`product`, `collection_list`, ...) have no meaningful
/// default; their ids are listed in `unsupported_settings` and their schema
/// entries are left alone. Key order inside the schema is preserved and the
/// JSON is re-emitted with two-space indentation. When there is no schema,
/// the schema is malformed, or nothing changes, the source is returned as is.
pub fn update_schema_defaults_with_report(source: &str, values: &SettingsState) -> SchemaDefaultsUpdate {
    let mut unsupported_settings = Vec::new();
    let unchanged = |unsupported_settings| SchemaDefaultsUpdate {
        code: source.to_string(),
        unsupported_settings,
    };

    let Some(span) = find_schema_block(source) else {
        return unchanged(unsupported_settings);
    };

    let mut root: Value = match serde_json::from_str(source[span.interior.clone()].trim()) {
        Ok(root) => root,
        Err(e) => {
            warn!("Not updating defaults, schema JSON is malformed: {}", e);
            return unchanged(unsupported_settings);
        }
    };

    let Some(settings) = root.get_mut("settings").and_then(Value::as_array_mut) else {
        return unchanged(unsupported_settings);
    };

    let mut changed = false;
    for setting in settings.iter_mut().filter_map(Value::as_object_mut) {
        let Some(id) = setting.get("id").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        let Some(value) = values.get(&id) else {
            continue;
        };

        let setting_type = setting
            .get("type")
            .and_then(Value::as_str)
            .map(SettingType::from)
            .unwrap_or_default();
        if setting_type.is_resource() {
            debug!("Setting {:?} is a {} picker, not writing a default", id, setting_type);
            unsupported_settings.push(id);
            continue;
        }

        let value = value.to_json();
        if setting.get("default") != Some(&value) {
            setting.insert("default".to_string(), value);
            changed = true;
        }
    }

    if !changed {
        return unchanged(unsupported_settings);
    }

    let pretty = match serde_json::to_string_pretty(&root) {
        Ok(pretty) => pretty,
        Err(e) => {
            warn!("Failed to serialize updated schema: {}", e);
            return unchanged(unsupported_settings);
        }
    };

    let mut code = String::with_capacity(source.len() + pretty.len());
    code.push_str(&source[..span.interior.start]);
    code.push('\n');
    code.push_str(&pretty);
    code.push('\n');
    code.push_str(&source[span.interior.end..]);

    SchemaDefaultsUpdate {
        code,
        unsupported_settings,
    }
}
