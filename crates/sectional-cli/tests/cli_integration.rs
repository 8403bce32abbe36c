// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Integration tests for the CLI commands.
//!
//! These drive the command functions against template files in a temp directory.

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use sectional::SettingValue;
use sectional_cli::commands::defaults::{apply, DefaultsArgs};
use sectional_cli::commands::diff::{changed_values, DiffArgs};
use sectional_cli::commands::preview::{compile, PreviewArgs};
use sectional_cli::commands::schema::{render, SchemaArgs};
use sectional_cli::config::Config;

const SLIDESHOW: &str = r#"<div class="slides">
  <h2>{{ section.settings.title }}</h2>
  {%- for slide in section.blocks -%}
    <figure>{{ slide.settings.image | image_url: width: 800 | image_tag: alt: 'Slide' }}<figcaption>{{ slide.settings.caption }}</figcaption></figure>
  {%- endfor -%}
</div>
{% schema %}
{
  "name": "t:sections.slideshow.name",
  "max_blocks": 3,
  "settings": [
    { "type": "text", "id": "title", "label": "t:sections.slideshow.settings.title.label", "default": "Spring" },
    { "type": "range", "id": "speed", "label": "Speed", "min": 1, "max": 9, "step": 1, "default": 5 },
    { "type": "product", "id": "featured", "label": "Featured" }
  ],
  "blocks": [
    { "type": "slide", "name": "Slide", "settings": [
      { "type": "image_picker", "id": "image", "label": "Image" },
      { "type": "text", "id": "caption", "label": "Caption", "default": "Caption" }
    ] }
  ],
  "presets": [ { "name": "Slideshow", "blocks": [ { "type": "slide" }, { "type": "slide" } ] } ]
}
{% endschema %}"#;

/// Write the slideshow template into a temp directory
fn setup_template(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("slideshow.liquid");
    fs::write(&path, SLIDESHOW).unwrap();
    path
}

fn preview_args(template: std::path::PathBuf) -> PreviewArgs {
    PreviewArgs {
        template,
        settings: None,
        blocks: None,
        product: None,
        collection: None,
        section_id: None,
        json: false,
        output: None,
    }
}

#[test]
fn test_preview_uses_defaults_and_presets() {
    let dir = tempdir().unwrap();
    let template = setup_template(dir.path());

    let output = compile(&preview_args(template), &Config::default()).unwrap();

    assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
    assert!(output.markup.contains("{% assign settings_title = 'Spring' %}"));
    assert!(output.markup.contains("{% assign block_0_id = 'slide-1' %}"));
    assert!(output.markup.contains("{% assign block_1_id = 'slide-2' %}"));
    assert!(output.markup.contains("{% assign blocks_count = 2 %}"));
    assert!(output.markup.contains(r#"<img src="{{ block_2_image }}" alt="Slide">"#));
    assert!(output.markup.contains(r#"id="shopify-section-preview""#));
}

#[test]
fn test_preview_with_files_and_handles() {
    let dir = tempdir().unwrap();
    let template = setup_template(dir.path());
    let settings = dir.path().join("settings.json");
    let blocks = dir.path().join("blocks.json");
    fs::write(&settings, r#"{ "title": "Autumn", "speed": 3 }"#).unwrap();
    fs::write(
        &blocks,
        r#"[{ "id": "s1", "type": "slide", "settings": { "caption": "First" } }]"#,
    )
    .unwrap();

    let mut args = preview_args(template);
    args.settings = Some(settings);
    args.blocks = Some(blocks);
    args.product = Some("red-shoes".into());
    args.section_id = Some("slides-1".into());

    let output = compile(&args, &Config::default()).unwrap();

    assert!(output.markup.starts_with("{% assign product = all_products['red-shoes'] %}\n"));
    assert!(output.markup.contains("{% assign settings_title = 'Autumn' %}"));
    assert!(output.markup.contains("{% assign settings_speed = 3 %}"));
    assert!(output.markup.contains("{% assign block_0_caption = 'First' %}"));
    assert!(output.markup.contains("{% assign blocks_count = 1 %}"));
    assert!(output.markup.contains(r#"id="shopify-section-slides-1""#));
}

#[test]
fn test_preview_rejects_oversized_settings() {
    let dir = tempdir().unwrap();
    let template = setup_template(dir.path());
    let settings = dir.path().join("settings.json");
    fs::write(&settings, format!(r#"{{ "title": "{}" }}"#, "x".repeat(200))).unwrap();

    let mut config = Config::default();
    config.preview.max_payload_bytes = 64;
    let mut args = preview_args(template);
    args.settings = Some(settings);

    assert!(compile(&args, &config).is_err());
}

#[test]
fn test_schema_defaults_and_labels() {
    let dir = tempdir().unwrap();
    let template = setup_template(dir.path());

    let defaults = render(&SchemaArgs {
        template: template.clone(),
        defaults: true,
        raw: false,
    })
    .unwrap();
    let state: serde_json::Value = serde_json::from_str(&defaults).unwrap();
    assert_eq!(state["title"], "Spring");
    assert_eq!(state["speed"], 5);
    assert_eq!(state["featured"], "");

    let resolved = render(&SchemaArgs {
        template: template.clone(),
        defaults: false,
        raw: false,
    })
    .unwrap();
    assert!(resolved.contains(r#""label": "Title""#));

    let raw = render(&SchemaArgs {
        template,
        defaults: false,
        raw: true,
    })
    .unwrap();
    assert!(raw.contains("t:sections.slideshow.settings.title.label"));
}

#[test]
fn test_schema_without_block_fails() {
    let dir = tempdir().unwrap();
    let template = dir.path().join("plain.liquid");
    fs::write(&template, "<p>No schema</p>").unwrap();

    let result = render(&SchemaArgs {
        template,
        defaults: false,
        raw: false,
    });
    assert!(result.is_err());
}

#[test]
fn test_defaults_and_diff() {
    let dir = tempdir().unwrap();
    let template = setup_template(dir.path());
    let values = dir.path().join("values.json");
    fs::write(&values, r#"{ "title": "Summer", "speed": 5, "featured": "red-shoes" }"#).unwrap();

    let diff = changed_values(
        &DiffArgs {
            template: template.clone(),
            values: values.clone(),
        },
        &Config::default(),
    )
    .unwrap();
    assert_eq!(diff.len(), 2);
    assert_eq!(diff["title"], SettingValue::from("Summer"));
    assert_eq!(diff["featured"], SettingValue::from("red-shoes"));

    let update = apply(
        &DefaultsArgs {
            template,
            values,
            write: false,
        },
        &Config::default(),
    )
    .unwrap();
    assert!(update.code.contains(r#""default": "Summer""#));
    assert!(!update.code.contains("red-shoes"));
    assert_eq!(update.unsupported_settings, vec!["featured"]);
}

#[test]
fn test_config_file_overrides() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("sectional.toml");
    fs::write(&config_path, "[preview]\nmax_blocks = 2\ncontainer_class = \"theme-preview\"\n").unwrap();

    let config = Config::load_from(&config_path).unwrap();
    assert_eq!(config.preview.max_blocks, 2);

    let template = setup_template(dir.path());
    let output = compile(&preview_args(template), &config).unwrap();
    assert!(output.markup.contains(r#"<div class="theme-preview""#));
    assert!(!output.markup.contains("{% if blocks_count > 2 %}"));

    fs::write(&config_path, "[preview]\nmax_blocks = 0\n").unwrap();
    assert!(Config::load_from(&config_path).is_err());
}
