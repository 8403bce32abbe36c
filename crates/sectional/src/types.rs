// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Schema and runtime types.
//!
//! The schema types mirror the JSON an author writes between
//! `{% schema %}` and `{% endschema %}`. Every optional field defaults so that
//! partially written schemas still parse; the only hard requirement is
//! syntactically valid JSON with an object at the root.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered map from setting id to value.
///
/// Insertion order is the order statements are generated in.
pub type SettingsState = IndexMap<String, SettingValue>;

/// The input setting types a section schema may declare.
///
/// Unknown type names are kept in [`SettingType::Other`] so a schema written
/// against a newer vocabulary still parses and round-trips.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum SettingType {
    // Basic input
    #[default]
    Text,
    Textarea,
    Richtext,
    InlineRichtext,
    Number,
    Range,
    Checkbox,
    Select,
    Radio,
    // Color and design
    Color,
    ColorBackground,
    FontPicker,
    TextAlignment,
    // Media
    ImagePicker,
    Video,
    VideoUrl,
    // Rich content
    Url,
    Html,
    Liquid,
    // Resource pickers
    Article,
    Blog,
    Collection,
    Page,
    Product,
    LinkList,
    // Resource lists
    CollectionList,
    ProductList,
    // Sidebar
    Header,
    Paragraph,
    // Advanced
    ColorScheme,
    ColorSchemeGroup,
    Metaobject,
    MetaobjectList,
    /// A type name this crate does not know.
    Other(String),
}

impl SettingType {
    /// The schema spelling of this type.
    pub fn as_str(&self) -> &str {
        match self {
            SettingType::Text => "text",
            SettingType::Textarea => "textarea",
            SettingType::Richtext => "richtext",
            SettingType::InlineRichtext => "inline_richtext",
            SettingType::Number => "number",
            SettingType::Range => "range",
            SettingType::Checkbox => "checkbox",
            SettingType::Select => "select",
            SettingType::Radio => "radio",
            SettingType::Color => "color",
            SettingType::ColorBackground => "color_background",
            SettingType::FontPicker => "font_picker",
            SettingType::TextAlignment => "text_alignment",
            SettingType::ImagePicker => "image_picker",
            SettingType::Video => "video",
            SettingType::VideoUrl => "video_url",
            SettingType::Url => "url",
            SettingType::Html => "html",
            SettingType::Liquid => "liquid",
            SettingType::Article => "article",
            SettingType::Blog => "blog",
            SettingType::Collection => "collection",
            SettingType::Page => "page",
            SettingType::Product => "product",
            SettingType::LinkList => "link_list",
            SettingType::CollectionList => "collection_list",
            SettingType::ProductList => "product_list",
            SettingType::Header => "header",
            SettingType::Paragraph => "paragraph",
            SettingType::ColorScheme => "color_scheme",
            SettingType::ColorSchemeGroup => "color_scheme_group",
            SettingType::Metaobject => "metaobject",
            SettingType::MetaobjectList => "metaobject_list",
            SettingType::Other(name) => name,
        }
    }

    /// Types whose value references a store resource.
    ///
    /// These never carry a meaningful default and are reported as unsupported
    /// when a caller tries to persist one.
    pub fn is_resource(&self) -> bool {
        matches!(
            self,
            SettingType::Product
                | SettingType::Collection
                | SettingType::Article
                | SettingType::Blog
                | SettingType::Page
                | SettingType::LinkList
                | SettingType::ProductList
                | SettingType::CollectionList
                | SettingType::Metaobject
                | SettingType::MetaobjectList
        )
    }

    /// Types that only change presentation, not content.
    pub fn is_presentational(&self) -> bool {
        matches!(
            self,
            SettingType::Checkbox
                | SettingType::Color
                | SettingType::ColorBackground
                | SettingType::ColorScheme
                | SettingType::FontPicker
                | SettingType::Number
                | SettingType::Radio
                | SettingType::Range
                | SettingType::Select
                | SettingType::TextAlignment
        )
    }

    /// Sidebar-only types that hold no value.
    pub fn is_display_only(&self) -> bool {
        matches!(self, SettingType::Header | SettingType::Paragraph)
    }

    /// The injected resource variable for single-resource pickers.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            SettingType::Product => Some(ResourceKind::Product),
            SettingType::Collection => Some(ResourceKind::Collection),
            SettingType::Article => Some(ResourceKind::Article),
            SettingType::Blog => Some(ResourceKind::Blog),
            SettingType::Page => Some(ResourceKind::Page),
            _ => None,
        }
    }
}

impl From<String> for SettingType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "text" => SettingType::Text,
            "textarea" => SettingType::Textarea,
            "richtext" => SettingType::Richtext,
            "inline_richtext" => SettingType::InlineRichtext,
            "number" => SettingType::Number,
            "range" => SettingType::Range,
            "checkbox" => SettingType::Checkbox,
            "select" => SettingType::Select,
            "radio" => SettingType::Radio,
            "color" => SettingType::Color,
            "color_background" => SettingType::ColorBackground,
            "font_picker" => SettingType::FontPicker,
            "text_alignment" => SettingType::TextAlignment,
            "image_picker" => SettingType::ImagePicker,
            "video" => SettingType::Video,
            "video_url" => SettingType::VideoUrl,
            "url" => SettingType::Url,
            "html" => SettingType::Html,
            "liquid" => SettingType::Liquid,
            "article" => SettingType::Article,
            "blog" => SettingType::Blog,
            "collection" => SettingType::Collection,
            "page" => SettingType::Page,
            "product" => SettingType::Product,
            "link_list" => SettingType::LinkList,
            "collection_list" => SettingType::CollectionList,
            "product_list" => SettingType::ProductList,
            "header" => SettingType::Header,
            "paragraph" => SettingType::Paragraph,
            "color_scheme" => SettingType::ColorScheme,
            "color_scheme_group" => SettingType::ColorSchemeGroup,
            "metaobject" => SettingType::Metaobject,
            "metaobject_list" => SettingType::MetaobjectList,
            _ => SettingType::Other(name),
        }
    }
}

impl From<&str> for SettingType {
    fn from(name: &str) -> Self {
        SettingType::from(name.to_string())
    }
}

impl From<SettingType> for String {
    fn from(setting_type: SettingType) -> Self {
        match setting_type {
            SettingType::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource objects the caller injects as first-class template variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// `product`
    Product,
    /// `collection`
    Collection,
    /// `article`
    Article,
    /// `blog`
    Blog,
    /// `page`
    Page,
}

impl ResourceKind {
    /// Every kind, in the order of the legacy id-name fallback list.
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Product,
        ResourceKind::Collection,
        ResourceKind::Article,
        ResourceKind::Blog,
        ResourceKind::Page,
    ];

    /// The variable name the resource is injected under.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Product => "product",
            ResourceKind::Collection => "collection",
            ResourceKind::Article => "article",
            ResourceKind::Blog => "blog",
            ResourceKind::Page => "page",
        }
    }

    /// Looks up a kind by its variable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// A single setting value.
///
/// `Nil` is an explicit JSON `null`. Arrays and objects decode into
/// `Unsupported` so a caller payload never fails as a whole; the assign
/// generators skip them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number.
    Number(f64),
    /// A string.
    String(String),
    /// Explicit null.
    Nil,
    /// An array or object; not representable as a flat assign.
    Unsupported(serde_json::Value),
}

impl SettingValue {
    /// Converts to JSON, writing integral numbers without a fraction.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SettingValue::Bool(b) => serde_json::Value::Bool(*b),
            SettingValue::Number(n) => match integral(*n) {
                Some(i) => serde_json::Value::from(i),
                None => serde_json::Number::from_f64(*n)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            SettingValue::String(s) => serde_json::Value::String(s.clone()),
            SettingValue::Nil => serde_json::Value::Null,
            SettingValue::Unsupported(v) => v.clone(),
        }
    }

    /// Returns the string slice for string values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for SettingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for SettingValue {
    fn from(s: &str) -> Self {
        SettingValue::String(s.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(s: String) -> Self {
        SettingValue::String(s)
    }
}

impl From<bool> for SettingValue {
    fn from(b: bool) -> Self {
        SettingValue::Bool(b)
    }
}

impl From<f64> for SettingValue {
    fn from(n: f64) -> Self {
        SettingValue::Number(n)
    }
}

impl From<i64> for SettingValue {
    fn from(n: i64) -> Self {
        SettingValue::Number(n as f64)
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Number(n) => f.write_str(&format_number(*n)),
            SettingValue::String(s) => f.write_str(s),
            SettingValue::Nil => f.write_str("nil"),
            SettingValue::Unsupported(v) => write!(f, "{}", v),
        }
    }
}

fn integral(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15 {
        Some(n as i64)
    } else {
        None
    }
}

/// Formats a number the way Liquid prints it: `3`, `0.5`, `-10`.
pub fn format_number(n: f64) -> String {
    match integral(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

/// One choice of a `select` or `radio` setting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SelectOption {
    /// Stored value.
    pub value: String,
    /// Display label, possibly a translation key.
    #[serde(default)]
    pub label: String,
    /// Optional option group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

/// One declared configurable field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaSetting {
    /// The input type.
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    /// Stable key; empty for display-only settings.
    #[serde(default)]
    pub id: String,
    /// Display label, possibly a translation key.
    #[serde(default)]
    pub label: String,
    /// Explicit default value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SettingValue>,
    /// Placeholder text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    /// Choices for `select` / `radio`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    /// Lower bound for numeric settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for numeric settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Step for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Unit suffix for `range`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Body of `header` / `paragraph`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Accepted providers for `video_url`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    /// Item cap for list types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl SchemaSetting {
    /// Shorthand used mostly by tests and presets.
    pub fn new(setting_type: impl Into<SettingType>, id: &str, label: &str) -> Self {
        Self {
            setting_type: setting_type.into(),
            id: id.to_string(),
            label: label.to_string(),
            ..Default::default()
        }
    }
}

/// A block type declared by the section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaBlock {
    /// Block type identifier.
    #[serde(rename = "type")]
    pub block_type: String,
    /// Display name, possibly a translation key.
    #[serde(default)]
    pub name: String,
    /// Settings of this block type.
    #[serde(default)]
    pub settings: Vec<SchemaSetting>,
    /// Maximum instances of this type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// A block inside a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PresetBlock {
    /// Block type identifier.
    #[serde(rename = "type")]
    pub block_type: String,
    /// Setting overrides for this block.
    #[serde(default)]
    pub settings: SettingsState,
}

/// A named starting configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaPreset {
    /// Preset name.
    #[serde(default)]
    pub name: String,
    /// Section setting overrides.
    #[serde(default)]
    pub settings: SettingsState,
    /// Blocks created by the preset.
    #[serde(default, deserialize_with = "deserialize_preset_blocks")]
    pub blocks: Vec<PresetBlock>,
}

/// Preset blocks are either an ordered array or a map keyed by block id.
fn deserialize_preset_blocks<'de, D>(deserializer: D) -> Result<Vec<PresetBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Blocks {
        List(Vec<PresetBlock>),
        Keyed(IndexMap<String, PresetBlock>),
    }

    Ok(match Option::<Blocks>::deserialize(deserializer)? {
        Some(Blocks::List(list)) => list,
        Some(Blocks::Keyed(map)) => map.into_values().collect(),
        None => Vec::new(),
    })
}

/// Root of a parsed section schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SchemaDefinition {
    /// Section name; may be empty (a soft warning, not an error).
    #[serde(default)]
    pub name: String,
    /// Wrapper tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Wrapper class.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Section instance limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Maximum blocks in the section.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_blocks: Option<u32>,
    /// Section settings in declaration order.
    #[serde(default)]
    pub settings: Vec<SchemaSetting>,
    /// Declared block types.
    #[serde(default)]
    pub blocks: Vec<SchemaBlock>,
    /// Presets.
    #[serde(default)]
    pub presets: Vec<SchemaPreset>,
    /// Default content used when the section is added outside a preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<SchemaPreset>,
}

impl SchemaDefinition {
    /// Finds a declared block type.
    pub fn block(&self, block_type: &str) -> Option<&SchemaBlock> {
        self.blocks.iter().find(|b| b.block_type == block_type)
    }
}

/// A concrete block occurrence for one render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BlockInstance {
    /// Caller-assigned id, unique per render.
    pub id: String,
    /// Declared block type.
    #[serde(rename = "type")]
    pub block_type: String,
    /// Values scoped to this block.
    #[serde(default)]
    pub settings: SettingsState,
}

impl BlockInstance {
    /// Creates a block instance.
    pub fn new(id: impl Into<String>, block_type: impl Into<String>, settings: SettingsState) -> Self {
        Self {
            id: id.into(),
            block_type: block_type.into(),
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_setting_type_round_trips() {
        let setting: SchemaSetting =
            serde_json::from_str(r#"{"type":"future_picker","id":"x","label":"X"}"#).unwrap();
        assert_eq!(setting.setting_type, SettingType::Other("future_picker".into()));
        let json = serde_json::to_string(&setting).unwrap();
        assert!(json.contains(r#""type":"future_picker""#));
    }

    #[test]
    fn test_resource_and_presentational_sets() {
        let resources = [
            "product", "collection", "article", "blog", "page", "link_list",
            "product_list", "collection_list", "metaobject", "metaobject_list",
        ];
        for name in resources {
            assert!(SettingType::from(name).is_resource(), "{name}");
        }
        for name in ["text", "number", "checkbox", "color", "select", "image_picker"] {
            assert!(!SettingType::from(name).is_resource(), "{name}");
        }

        let presentational = [
            "checkbox", "color", "color_background", "color_scheme", "font_picker",
            "number", "radio", "range", "select", "text_alignment",
        ];
        for name in presentational {
            assert!(SettingType::from(name).is_presentational(), "{name}");
        }
        for name in ["text", "textarea", "richtext", "product", "collection", "image_picker"] {
            assert!(!SettingType::from(name).is_presentational(), "{name}");
        }
    }

    #[test]
    fn test_setting_value_decodes_every_json_shape() {
        let state: SettingsState = serde_json::from_str(
            r#"{"a":"x","b":3,"c":0.5,"d":true,"e":null,"f":[1],"g":{"k":1}}"#,
        )
        .unwrap();
        assert_eq!(state["a"], SettingValue::from("x"));
        assert_eq!(state["b"], SettingValue::Number(3.0));
        assert_eq!(state["c"], SettingValue::Number(0.5));
        assert_eq!(state["d"], SettingValue::Bool(true));
        assert_eq!(state["e"], SettingValue::Nil);
        assert!(matches!(state["f"], SettingValue::Unsupported(_)));
        assert!(matches!(state["g"], SettingValue::Unsupported(_)));
        let keys: Vec<&str> = state.keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b", "c", "d", "e", "f", "g"]);
    }

    #[test]
    fn test_numbers_format_without_trailing_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-10.0), "-10");
        assert_eq!(SettingValue::Number(4.0).to_json(), serde_json::json!(4));
    }

    #[test]
    fn test_preset_blocks_accept_keyed_map() {
        let preset: SchemaPreset = serde_json::from_str(
            r#"{"name":"P","blocks":{"b1":{"type":"slide"},"b2":{"type":"slide"}}}"#,
        )
        .unwrap();
        assert_eq!(preset.blocks.len(), 2);
        assert_eq!(preset.blocks[0].block_type, "slide");
    }
}
