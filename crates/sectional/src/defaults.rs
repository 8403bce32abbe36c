// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Default settings state.
//!
//! Every setting gets exactly one effective default: its explicit `default`
//! when present, otherwise a fallback chosen by type. The fallback table is an
//! exhaustive match, so adding a [`SettingType`] variant fails to compile until
//! it is given a fallback here.

use crate::types::{SchemaDefinition, SchemaSetting, SettingType, SettingValue, SettingsState};

/// Font identifier used for `font_picker` settings without a default.
pub const SYSTEM_FONT: &str = "system-ui";

/// The type-driven default for a setting, ignoring any explicit default.
///
/// Returns `None` for display-only types, which never hold a value.
pub fn fallback_default(setting: &SchemaSetting) -> Option<SettingValue> {
    let empty = || SettingValue::String(String::new());

    let value = match &setting.setting_type {
        SettingType::Checkbox => SettingValue::Bool(false),
        SettingType::Number | SettingType::Range => {
            SettingValue::Number(setting.min.unwrap_or(0.0))
        }
        SettingType::Color | SettingType::ColorBackground => SettingValue::from("#000000"),
        SettingType::Select | SettingType::Radio => setting
            .options
            .first()
            .map(|option| SettingValue::from(option.value.as_str()))
            .unwrap_or_else(empty),
        SettingType::TextAlignment => SettingValue::from("left"),
        SettingType::FontPicker => SettingValue::from(SYSTEM_FONT),
        SettingType::ImagePicker | SettingType::Video | SettingType::VideoUrl => empty(),
        SettingType::CollectionList | SettingType::ProductList | SettingType::MetaobjectList => {
            SettingValue::from("[]")
        }
        SettingType::Product
        | SettingType::Collection
        | SettingType::Article
        | SettingType::Blog
        | SettingType::Page
        | SettingType::LinkList
        | SettingType::Metaobject => empty(),
        SettingType::Url => SettingValue::from("#"),
        SettingType::Text
        | SettingType::Textarea
        | SettingType::Richtext
        | SettingType::InlineRichtext
        | SettingType::Html
        | SettingType::Liquid
        | SettingType::ColorScheme
        | SettingType::ColorSchemeGroup => empty(),
        SettingType::Header | SettingType::Paragraph => return None,
        SettingType::Other(_) => empty(),
    };

    Some(value)
}

/// The explicit default when present, otherwise the type fallback.
pub fn effective_default(setting: &SchemaSetting) -> Option<SettingValue> {
    if setting.setting_type.is_display_only() {
        return None;
    }
    match &setting.default {
        Some(explicit) => Some(explicit.clone()),
        None => fallback_default(setting),
    }
}

/// Builds the settings state a preview starts from.
///
/// One entry per setting with an id, in declaration order. Display-only
/// settings and settings without an id produce no entry.
pub fn build_initial_state(settings: &[SchemaSetting]) -> SettingsState {
    settings
        .iter()
        .filter(|setting| !setting.id.is_empty())
        .filter_map(|setting| effective_default(setting).map(|value| (setting.id.clone(), value)))
        .collect()
}

/// Values that differ from their setting's effective default.
///
/// Keys not declared by the schema are ignored.
pub fn settings_diff(schema: Option<&SchemaDefinition>, values: &SettingsState) -> SettingsState {
    let Some(schema) = schema else {
        return SettingsState::new();
    };

    schema
        .settings
        .iter()
        .filter(|setting| !setting.id.is_empty())
        .filter_map(|setting| {
            let value = values.get(&setting.id)?;
            if effective_default(setting).as_ref() == Some(value) {
                None
            } else {
                Some((setting.id.clone(), value.clone()))
            }
        })
        .collect()
}

/// Coerces an editor value to the shape its setting type stores.
///
/// `checkbox` becomes a boolean, `number`/`range` a number (unparseable input
/// becomes `0`), everything else a string.
pub fn coerce_value(value: &SettingValue, setting_type: &SettingType) -> SettingValue {
    match setting_type {
        SettingType::Checkbox => SettingValue::Bool(match value {
            SettingValue::Bool(b) => *b,
            SettingValue::Number(n) => *n != 0.0 && !n.is_nan(),
            SettingValue::String(s) => !s.is_empty() && s != "false",
            SettingValue::Nil => false,
            SettingValue::Unsupported(_) => true,
        }),
        SettingType::Number | SettingType::Range => SettingValue::Number(match value {
            SettingValue::Number(n) if !n.is_nan() => *n,
            SettingValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| !n.is_nan()).unwrap_or(0.0),
            _ => 0.0,
        }),
        _ => SettingValue::String(match value {
            SettingValue::Nil => String::new(),
            other => other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectOption;

    fn option(value: &str) -> SelectOption {
        SelectOption {
            value: value.into(),
            label: value.into(),
            group: None,
        }
    }

    #[test]
    fn test_type_fallbacks() {
        let mut opacity = SchemaSetting::new("range", "opacity", "Opacity");
        opacity.min = Some(0.5);
        let mut size = SchemaSetting::new("select", "size", "Size");
        size.options = vec![option("small"), option("large")];
        let mut layout = SchemaSetting::new("radio", "layout", "Layout");
        layout.options = vec![option("grid"), option("list")];

        let settings = vec![
            SchemaSetting::new("checkbox", "enabled", "Enabled"),
            SchemaSetting::new("number", "count", "Count"),
            opacity,
            SchemaSetting::new("color", "text_color", "Text Color"),
            size,
            layout,
            SchemaSetting::new("select", "empty_select", "Nothing"),
            SchemaSetting::new("text_alignment", "align", "Align"),
            SchemaSetting::new("font_picker", "font", "Font"),
            SchemaSetting::new("image_picker", "image", "Image"),
            SchemaSetting::new("collection_list", "collections", "Collections"),
            SchemaSetting::new("product_list", "products", "Products"),
            SchemaSetting::new("url", "link", "Link"),
            SchemaSetting::new("product", "featured_product", "Product"),
            SchemaSetting::new("link_list", "menu", "Menu"),
            SchemaSetting::new("richtext", "body", "Body"),
            SchemaSetting::new("mystery_type", "mystery", "Mystery"),
        ];
        let state = build_initial_state(&settings);

        assert_eq!(state["enabled"], SettingValue::Bool(false));
        assert_eq!(state["count"], SettingValue::Number(0.0));
        assert_eq!(state["opacity"], SettingValue::Number(0.5));
        assert_eq!(state["text_color"], SettingValue::from("#000000"));
        assert_eq!(state["size"], SettingValue::from("small"));
        assert_eq!(state["layout"], SettingValue::from("grid"));
        assert_eq!(state["empty_select"], SettingValue::from(""));
        assert_eq!(state["align"], SettingValue::from("left"));
        assert_eq!(state["font"], SettingValue::from("system-ui"));
        assert_eq!(state["image"], SettingValue::from(""));
        assert_eq!(state["collections"], SettingValue::from("[]"));
        assert_eq!(state["products"], SettingValue::from("[]"));
        assert_eq!(state["link"], SettingValue::from("#"));
        assert_eq!(state["featured_product"], SettingValue::from(""));
        assert_eq!(state["menu"], SettingValue::from(""));
        assert_eq!(state["body"], SettingValue::from(""));
        assert_eq!(state["mystery"], SettingValue::from(""));
        assert_eq!(state.len(), settings.len());
    }

    #[test]
    fn test_explicit_default_wins_verbatim() {
        let mut link = SchemaSetting::new("url", "link", "Link");
        link.default = Some(SettingValue::from("/products"));
        let mut count = SchemaSetting::new("number", "count", "Count");
        count.default = Some(SettingValue::from("7"));

        let state = build_initial_state(&[link, count]);
        assert_eq!(state["link"], SettingValue::from("/products"));
        assert_eq!(state["count"], SettingValue::from("7"));
    }

    #[test]
    fn test_display_only_settings_have_no_entry() {
        let settings = vec![
            SchemaSetting::new("header", "header1", "Section Header"),
            SchemaSetting::new("paragraph", "para1", "Info text"),
            SchemaSetting::new("text", "title", "Title"),
        ];
        let state = build_initial_state(&settings);
        assert!(!state.contains_key("header1"));
        assert!(!state.contains_key("para1"));
        assert_eq!(state["title"], SettingValue::from(""));
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_settings_without_id_are_skipped() {
        let state = build_initial_state(&[SchemaSetting::new("text", "", "Orphan")]);
        assert!(state.is_empty());
    }

    #[test]
    fn test_settings_diff_against_effective_defaults() {
        let mut heading = SchemaSetting::new("text", "heading", "Heading");
        heading.default = Some("Hello".into());
        let mut count = SchemaSetting::new("number", "count", "Count");
        count.default = Some(SettingValue::Number(5.0));
        let schema = SchemaDefinition {
            name: "Test".into(),
            settings: vec![
                SchemaSetting::new("header", "", "Header"),
                heading,
                count,
                SchemaSetting::new("checkbox", "enabled", "Enabled"),
                SchemaSetting::new("url", "link", "Link"),
            ],
            ..Default::default()
        };

        let mut values = SettingsState::new();
        values.insert("heading".into(), "Hello".into());
        values.insert("count".into(), SettingValue::Number(10.0));
        values.insert("enabled".into(), SettingValue::Bool(false));
        values.insert("link".into(), "/products".into());
        values.insert("unknown".into(), "x".into());

        let diff = settings_diff(Some(&schema), &values);
        assert_eq!(diff.len(), 2);
        assert_eq!(diff["count"], SettingValue::Number(10.0));
        assert_eq!(diff["link"], SettingValue::from("/products"));

        assert!(settings_diff(None, &values).is_empty());
    }

    #[test]
    fn test_coerce_value() {
        let checkbox = SettingType::Checkbox;
        assert_eq!(coerce_value(&SettingValue::Number(1.0), &checkbox), SettingValue::Bool(true));
        assert_eq!(coerce_value(&SettingValue::Number(0.0), &checkbox), SettingValue::Bool(false));
        assert_eq!(coerce_value(&"true".into(), &checkbox), SettingValue::Bool(true));
        assert_eq!(coerce_value(&"".into(), &checkbox), SettingValue::Bool(false));

        let number = SettingType::Number;
        assert_eq!(coerce_value(&"42".into(), &number), SettingValue::Number(42.0));
        assert_eq!(coerce_value(&"2.75".into(), &number), SettingValue::Number(2.75));
        assert_eq!(coerce_value(&"invalid".into(), &number), SettingValue::Number(0.0));
        assert_eq!(coerce_value(&"0.5".into(), &SettingType::Range), SettingValue::Number(0.5));

        let text = SettingType::Text;
        assert_eq!(coerce_value(&SettingValue::Number(123.0), &text), SettingValue::from("123"));
        assert_eq!(coerce_value(&SettingValue::Bool(true), &text), SettingValue::from("true"));
        assert_eq!(coerce_value(&"red".into(), &SettingType::Color), SettingValue::from("red"));
    }
}
