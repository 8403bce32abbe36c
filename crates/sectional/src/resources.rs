// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Resource-picker detection.
//!
//! Settings that pick a product, collection, article, blog or page are not
//! flattened: the caller injects the resource object itself under its type
//! name, and accessors are rewritten to that name.

use crate::types::{ResourceKind, SchemaDefinition, SchemaSetting};
use serde::Deserialize;
use std::collections::HashMap;

/// Setting id → injected resource, derived from a schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourcePickers {
    map: HashMap<String, ResourceKind>,
}

impl ResourcePickers {
    /// A map with no schema-derived entries; only the legacy name list applies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects single-resource pickers from section and block settings.
    pub fn from_schema(schema: &SchemaDefinition) -> Self {
        let mut map = HashMap::new();
        let block_settings = schema.blocks.iter().flat_map(|b| b.settings.iter());
        for setting in schema.settings.iter().chain(block_settings) {
            if let Some(kind) = picker_kind(setting) {
                map.insert(setting.id.clone(), kind);
            }
        }
        Self { map }
    }

    /// Schema-derived kind for a setting id.
    pub fn get(&self, id: &str) -> Option<ResourceKind> {
        self.map.get(id).copied()
    }

    /// Number of schema-derived pickers.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when the schema declared no pickers.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Variable an accessor for `id` is rewritten to, if it names a resource.
    ///
    /// The schema-derived map is consulted first; an id that equals a
    /// resource type name (`product`, `collection`, ...) is the fallback for
    /// templates whose schema could not be read.
    pub fn resource_target(&self, id: &str) -> Option<&'static str> {
        self.get(id)
            .or_else(|| ResourceKind::from_name(id))
            .map(|kind| kind.as_str())
    }
}

fn picker_kind(setting: &SchemaSetting) -> Option<ResourceKind> {
    if setting.id.is_empty() {
        return None;
    }
    setting.setting_type.resource_kind()
}

/// Store resources the caller wants injected as template variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResourceContext {
    /// Handle of the product bound to `product`.
    #[serde(default)]
    pub product_handle: Option<String>,
    /// Handle of the collection bound to `collection`.
    #[serde(default)]
    pub collection_handle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SchemaBlock;

    fn schema() -> SchemaDefinition {
        SchemaDefinition {
            name: "Featured".into(),
            settings: vec![
                SchemaSetting::new("product", "featured_product", "Product"),
                SchemaSetting::new("text", "title", "Title"),
                SchemaSetting::new("collection", "product", "Oddly named"),
                SchemaSetting::new("product_list", "products", "Products"),
            ],
            blocks: vec![SchemaBlock {
                block_type: "card".into(),
                name: "Card".into(),
                settings: vec![SchemaSetting::new("blog", "source_blog", "Blog")],
                limit: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_collects_section_and_block_pickers() {
        let pickers = ResourcePickers::from_schema(&schema());
        assert_eq!(pickers.get("featured_product"), Some(ResourceKind::Product));
        assert_eq!(pickers.get("source_blog"), Some(ResourceKind::Blog));
        assert_eq!(pickers.get("title"), None);
        assert_eq!(pickers.get("products"), None);
        assert_eq!(pickers.len(), 3);
    }

    #[test]
    fn test_schema_map_takes_precedence_over_legacy_names() {
        let pickers = ResourcePickers::from_schema(&schema());
        assert_eq!(pickers.resource_target("product"), Some("collection"));
        assert_eq!(pickers.resource_target("featured_product"), Some("product"));
        assert_eq!(pickers.resource_target("title"), None);
    }

    #[test]
    fn test_legacy_names_without_schema() {
        let pickers = ResourcePickers::new();
        assert_eq!(pickers.resource_target("collection"), Some("collection"));
        assert_eq!(pickers.resource_target("page"), Some("page"));
        assert_eq!(pickers.resource_target("heading"), None);
    }
}
