// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! # Sectional
//!
//! Section schema compiler and Liquid flattening transpiler.
//!
//! A section template carries its configuration as a JSON schema block next to
//! its markup. Sectional turns such a template into markup a restricted Liquid
//! interpreter can render: one that only understands plain variable
//! assignment, with no nested lookups and no iteration over blocks.
//!
//! ## Features
//!
//! - Schema extraction with translation-key label resolution
//! - A default value for every setting type
//! - Flat `{% assign %}` statements for settings and blocks
//! - `section.settings.X` accessor rewriting and image filter stripping
//! - Unrolling of `{% for block in section.blocks %}` loops
//! - Writing edited values back into the schema as defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use sectional::{compile_preview, CompileOptions, PreviewRequest};
//!
//! let source = r#"<h1>{{ section.settings.heading }}</h1>
//! {% schema %}
//! { "name": "Hero", "settings": [
//!   { "type": "text", "id": "heading", "label": "Heading", "default": "Hello" }
//! ] }
//! {% endschema %}"#;
//!
//! let output = compile_preview(source, &PreviewRequest::default(), &CompileOptions::default());
//! assert!(output.markup.contains("{% assign settings_heading = 'Hello' %}"));
//! assert!(output.markup.contains("<h1>{{ settings_heading }}</h1>"));
//! ```

/// Schema, setting and block types.
pub mod types;
/// Schema block extraction and parsing.
pub mod schema;
/// Translation-key label resolution.
pub mod labels;
/// Default settings state.
pub mod defaults;
/// Liquid identifier sanitizing.
pub mod sanitize;
/// Literal encoding for assign statements.
pub mod encode;
/// Assign statement generation.
pub mod assigns;
/// Resource-picker detection.
pub mod resources;
/// `section.settings` accessor rewriting.
pub mod rewrite;
/// Block loop unrolling.
pub mod unroll;
/// End-to-end preview compilation.
pub mod preview;
/// Writing values back into a schema as defaults.
pub mod defaults_editor;
/// Caller-owned parsed schema cache.
pub mod cache;
/// Diagnostic records.
pub mod diagnostics;
/// Error types and reporting.
pub mod error;

pub use assigns::*;
pub use cache::*;
pub use defaults::*;
pub use defaults_editor::*;
pub use diagnostics::*;
pub use encode::*;
pub use error::*;
pub use labels::*;
pub use preview::*;
pub use resources::*;
pub use rewrite::{rewrite_block_count, rewrite_section_settings, strip_image_filters};
pub use sanitize::*;
pub use schema::*;
pub use types::*;
pub use unroll::*;
