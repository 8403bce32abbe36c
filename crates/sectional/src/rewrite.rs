// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Accessor rewriting for section settings.
//!
//! Two passes run over the template body:
//!
//! 1. [`rewrite_section_settings`] turns `section.settings.X`,
//!    `section.settings['X']` and `section.settings["X"]` into the flat
//!    variable `settings_X`, or into the bare resource name for pickers.
//! 2. [`strip_image_filters`] removes `image_url` / `img_url` chains applied to
//!    flat variables, which already hold a URL rather than an image object.

use crate::resources::ResourcePickers;
use crate::sanitize::sanitize_identifier;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// A settings key as written after `.settings`. Inner dashes are allowed, a
/// trailing one is not: in `{{ x.settings.title-}}` it belongs to the tag.
const SETTING_KEY: &str = r"[A-Za-z_](?:[A-Za-z0-9_-]*[A-Za-z0-9_])?";

/// Pattern for `<object>.settings.X`, `['X']` and `["X"]`; the key lands in
/// capture group 1, 2 or 3.
pub(crate) fn settings_accessor_pattern(object: &str) -> String {
    format!(
        r#"\b{object}\.settings(?:\.({key})|\[\s*'({key})'\s*\]|\[\s*"({key})"\s*\])"#,
        object = object,
        key = SETTING_KEY
    )
}

lazy_static! {
    static ref SECTION_SETTING: Regex =
        Regex::new(&settings_accessor_pattern("section")).expect("section settings pattern");
    static ref BLOCK_COUNT: Regex =
        Regex::new(r"\bsection\.blocks(?:\.size\b|\s*\|\s*size\b)").expect("block count pattern");
    static ref OUTPUT_TAG: Regex =
        Regex::new(r"(?s)\{\{(-?)(.*?)(-?)\}\}").expect("output tag pattern");
    static ref FLAT_VARIABLE: Regex =
        Regex::new(r"^(?:settings|block_[0-9]+)_[A-Za-z0-9_]+$").expect("flat variable pattern");
    static ref LITERAL_ARG: Regex =
        Regex::new(r#"\b(class|alt)\s*:\s*(?:'([^']*)'|"([^"]*)")"#).expect("literal argument pattern");
}

const IMAGE_FILTERS: [&str; 2] = ["image_url", "img_url"];

/// Maps a settings key to the variable an accessor for it is rewritten to.
///
/// Returns `None` when the key cannot become an identifier; the accessor is
/// then left as written.
pub(crate) fn flat_target(prefix: &str, key: &str, pickers: &ResourcePickers) -> Option<String> {
    if let Some(resource) = pickers.resource_target(key) {
        return Some(resource.to_string());
    }
    sanitize_identifier(key).map(|safe| format!("{}_{}", prefix, safe))
}

/// First non-empty capture group among `groups`.
pub(crate) fn captured_key<'h>(caps: &Captures<'h>, groups: &[usize]) -> Option<&'h str> {
    groups.iter().find_map(|&i| caps.get(i)).map(|m| m.as_str())
}

/// Rewrites section settings accessors to flat variables.
///
/// ```
/// use sectional::{rewrite_section_settings, ResourcePickers};
///
/// let code = "{{ section.settings['title'] | upcase }}";
/// let out = rewrite_section_settings(code, &ResourcePickers::new());
/// assert_eq!(out, "{{ settings_title | upcase }}");
/// ```
pub fn rewrite_section_settings(code: &str, pickers: &ResourcePickers) -> String {
    SECTION_SETTING
        .replace_all(code, |caps: &Captures| {
            captured_key(caps, &[1, 2, 3])
                .and_then(|key| flat_target("settings", key, pickers))
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Rewrites `section.blocks.size` and `section.blocks | size` to `blocks_count`.
///
/// ```
/// use sectional::rewrite_block_count;
///
/// let out = rewrite_block_count("{% if section.blocks.size > 0 %}");
/// assert_eq!(out, "{% if blocks_count > 0 %}");
/// ```
pub fn rewrite_block_count(code: &str) -> String {
    BLOCK_COUNT.replace_all(code, "blocks_count").into_owned()
}

/// Removes image transformation filters applied to flat variables.
///
/// A chain ending in `image_tag` becomes an `<img>` element whose `src` is
/// the raw variable; `class` and `alt` literal arguments are carried over.
/// Any other chain keeps its remaining filters.
pub fn strip_image_filters(code: &str) -> String {
    OUTPUT_TAG
        .replace_all(code, |caps: &Captures| {
            rewrite_output_tag(&caps[1], &caps[2], &caps[3]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn rewrite_output_tag(open_dash: &str, inner: &str, close_dash: &str) -> Option<String> {
    let mut segments = split_filters(inner).into_iter();
    let subject = segments.next()?.trim().to_string();
    if !FLAT_VARIABLE.is_match(&subject) {
        return None;
    }

    let filters: Vec<String> = segments.map(|s| s.trim().to_string()).collect();
    if !filters.iter().any(|f| IMAGE_FILTERS.contains(&filter_name(f))) {
        return None;
    }

    let reference = format!("{{{{{} {} {}}}}}", open_dash, subject, close_dash);

    if let Some(last) = filters.last().filter(|f| filter_name(f) == "image_tag") {
        let mut alt = String::new();
        let mut class = None;
        for caps in LITERAL_ARG.captures_iter(last) {
            let value = captured_key(&caps, &[2, 3]).unwrap_or_default().to_string();
            match &caps[1] {
                "alt" => alt = value,
                _ => class = Some(value),
            }
        }
        let mut element = format!("<img src=\"{}\" alt=\"{}\"", reference, alt);
        if let Some(class) = class {
            element.push_str(&format!(" class=\"{}\"", class));
        }
        element.push('>');
        return Some(element);
    }

    let kept: Vec<&str> = filters
        .iter()
        .map(String::as_str)
        .filter(|f| !IMAGE_FILTERS.contains(&filter_name(f)))
        .collect();

    if kept.is_empty() {
        return Some(reference);
    }
    Some(format!(
        "{{{{{} {} | {} {}}}}}",
        open_dash,
        subject,
        kept.join(" | "),
        close_dash
    ))
}

fn filter_name(filter: &str) -> &str {
    filter.split(':').next().unwrap_or_default().trim()
}

/// Splits an output expression on `|`, ignoring pipes inside quoted strings.
fn split_filters(expression: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in expression.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '|') => {
                segments.push(&expression[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&expression[start..]);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SchemaDefinition, SchemaSetting};

    fn rewrite(code: &str) -> String {
        rewrite_section_settings(code, &ResourcePickers::new())
    }

    #[test]
    fn test_accessor_forms() {
        assert_eq!(rewrite("{{ section.settings.title }}"), "{{ settings_title }}");
        assert_eq!(rewrite("{{ section.settings['title'] }}"), "{{ settings_title }}");
        assert_eq!(rewrite(r#"{% if section.settings["show"] %}"#), "{% if settings_show %}");
        assert_eq!(
            rewrite("{{ section.settings.title | upcase | truncate: 20 }}"),
            "{{ settings_title | upcase | truncate: 20 }}"
        );
    }

    #[test]
    fn test_hyphenated_keys_match_assign_names() {
        assert_eq!(rewrite("{{ section.settings['my-key'] }}"), "{{ settings_my_key }}");
    }

    #[test]
    fn test_trim_dash_after_key_belongs_to_tag() {
        assert_eq!(
            rewrite("{{-section.settings.title-}}|{%-if section.settings.show-%}x{%-endif-%}"),
            "{{-settings_title-}}|{%-if settings_show-%}x{%-endif-%}"
        );
        assert_eq!(rewrite("{{ section.settings.my-key-}}"), "{{ settings_my_key-}}");
    }

    #[test]
    fn test_block_count() {
        assert_eq!(
            rewrite_block_count("{% if section.blocks.size > 0 %}{{ section.blocks | size }}{% endif %}"),
            "{% if blocks_count > 0 %}{{ blocks_count }}{% endif %}"
        );
        let code = "{{ section.blocks.sizes }}";
        assert_eq!(rewrite_block_count(code), code);
    }

    #[test]
    fn test_word_boundary() {
        let code = "{{ mysection.settings.title }}";
        assert_eq!(rewrite(code), code);
    }

    #[test]
    fn test_legacy_resource_names() {
        assert_eq!(
            rewrite("{{ section.settings.product.title }} {{ section.settings.collection.url }}"),
            "{{ product.title }} {{ collection.url }}"
        );
    }

    #[test]
    fn test_schema_pickers() {
        let schema = SchemaDefinition {
            name: "Featured".into(),
            settings: vec![
                SchemaSetting::new("product", "featured_product", "Product"),
                SchemaSetting::new("collection", "product", "Collection"),
            ],
            ..Default::default()
        };
        let pickers = ResourcePickers::from_schema(&schema);
        let out = rewrite_section_settings(
            "{{ section.settings.featured_product.title }}|{{ section.settings.product.url }}",
            &pickers,
        );
        assert_eq!(out, "{{ product.title }}|{{ collection.url }}");
    }

    #[test]
    fn test_image_tag_chain_becomes_img() {
        let out = strip_image_filters(
            "{{ settings_image | image_url: width: 800 | image_tag: class: 'hero', alt: 'Hero' }}",
        );
        assert_eq!(out, r#"<img src="{{ settings_image }}" alt="Hero" class="hero">"#);

        let out = strip_image_filters("{{ block_2_photo | img_url: 'master' | image_tag }}");
        assert_eq!(out, r#"<img src="{{ block_2_photo }}" alt="">"#);
    }

    #[test]
    fn test_image_url_in_css_value() {
        let code = "background: url({{ settings_bg | image_url: width: 1920 }});";
        assert_eq!(strip_image_filters(code), "background: url({{ settings_bg }});");
    }

    #[test]
    fn test_other_filters_and_dashes_kept() {
        let out = strip_image_filters("{{- settings_bg | image_url: width: 10 | escape -}}");
        assert_eq!(out, "{{- settings_bg | escape -}}");
    }

    #[test]
    fn test_non_flat_subjects_untouched() {
        let code = "{{ product.featured_image | image_url: width: 400 | image_tag }}";
        assert_eq!(strip_image_filters(code), code);
        let plain = "{{ settings_title | upcase }}";
        assert_eq!(strip_image_filters(plain), plain);
    }

    #[test]
    fn test_split_ignores_quoted_pipes() {
        assert_eq!(split_filters("a | append: '|' | b"), vec!["a ", " append: '|' ", " b"]);
    }
}
