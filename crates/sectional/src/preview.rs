// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Preview compilation.
//!
//! [`compile_preview`] runs the whole pipeline for one request:
//!
//! 1. parse the schema (failing open),
//! 2. choose the settings state: the request's, or the schema defaults,
//! 3. choose the blocks: the request's, or instances from the first preset,
//! 4. strip the schema, unroll block loops, rewrite accessors and block
//!    counts, strip image filters,
//! 5. prepend the assign statements and wrap the markup in an isolation
//!    container.
//!
//! Every call is independent; no state survives between calls.

use crate::assigns::{blocks_assigns, resource_assigns, settings_assigns, Assigns};
use crate::defaults::build_initial_state;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::error::{Result, SectionalError};
use crate::resources::{ResourceContext, ResourcePickers};
use crate::rewrite::{rewrite_block_count, rewrite_section_settings, strip_image_filters};
use crate::sanitize::is_valid_section_id;
use crate::schema::{parse_schema_with_diagnostics, strip_schema};
use crate::types::{BlockInstance, SchemaDefinition, SchemaPreset, SettingsState};
use crate::unroll::{unroll_block_loops, UnrollOptions, DEFAULT_MAX_BLOCKS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Default byte threshold for settings and blocks payloads.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 4096;

/// Section id used when none is given or the given one is rejected.
pub const DEFAULT_SECTION_ID: &str = "preview";

/// Default class of the isolation container.
pub const DEFAULT_CONTAINER_CLASS: &str = "sectional-preview";

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileOptions {
    /// Copies per unrolled loop and the cap on block instances.
    #[serde(default = "default_max_blocks")]
    pub max_blocks: usize,

    /// Serialized settings or blocks above this size are dropped.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,

    /// CSS class of the wrapping container.
    #[serde(default = "default_container_class")]
    pub container_class: String,

    /// Section id used when the request does not carry one.
    #[serde(default = "default_section_id")]
    pub section_id: String,

    /// Build blocks from the first preset when the request has none.
    #[serde(default = "default_use_preset_blocks")]
    pub use_preset_blocks: bool,
}

fn default_max_blocks() -> usize {
    DEFAULT_MAX_BLOCKS
}

fn default_max_payload_bytes() -> usize {
    DEFAULT_MAX_PAYLOAD_BYTES
}

fn default_container_class() -> String {
    DEFAULT_CONTAINER_CLASS.to_string()
}

fn default_section_id() -> String {
    DEFAULT_SECTION_ID.to_string()
}

fn default_use_preset_blocks() -> bool {
    true
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            max_blocks: default_max_blocks(),
            max_payload_bytes: default_max_payload_bytes(),
            container_class: default_container_class(),
            section_id: default_section_id(),
            use_preset_blocks: default_use_preset_blocks(),
        }
    }
}

impl CompileOptions {
    /// Checks values that would produce unusable output.
    pub fn validate(&self) -> Result<()> {
        if self.max_blocks == 0 {
            return Err(SectionalError::Config("max_blocks must be at least 1".into()));
        }
        if !is_valid_section_id(&self.container_class) {
            return Err(SectionalError::Config(format!(
                "container_class {:?} must match [A-Za-z0-9_-]{{1,64}}",
                self.container_class
            )));
        }
        if !is_valid_section_id(&self.section_id) {
            return Err(SectionalError::Config(format!(
                "section_id {:?} must match [A-Za-z0-9_-]{{1,64}}",
                self.section_id
            )));
        }
        Ok(())
    }
}

/// Caller-supplied values for one preview.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PreviewRequest {
    /// Settings state; `None` uses the schema defaults.
    #[serde(default)]
    pub settings: Option<SettingsState>,
    /// Block instances; `None` may fall back to preset blocks.
    #[serde(default)]
    pub blocks: Option<Vec<BlockInstance>>,
    /// Resources bound to `product` / `collection`.
    #[serde(flatten)]
    pub resources: ResourceContext,
    /// Section id for the container; overrides the configured one.
    #[serde(default)]
    pub section_id: Option<String>,
}

/// Compiled markup plus everything that was skipped on the way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewOutput {
    /// Assign statements followed by the wrapped, flattened template.
    pub markup: String,
    /// Soft problems found while compiling.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles a section template into flat, loop-free preview markup.
pub fn compile_preview(source: &str, request: &PreviewRequest, options: &CompileOptions) -> PreviewOutput {
    let (schema, mut diagnostics) = parse_schema_with_diagnostics(source);
    let schema = schema.as_ref();

    let block_cap = schema
        .and_then(|s| s.max_blocks)
        .map(|cap| (cap as usize).min(options.max_blocks))
        .unwrap_or(options.max_blocks);

    let settings = match &request.settings {
        Some(settings) => within_limit("settings", settings, options.max_payload_bytes, &mut diagnostics)
            .cloned()
            .unwrap_or_default(),
        None => schema
            .map(|s| build_initial_state(&s.settings))
            .unwrap_or_default(),
    };

    let mut blocks = match (&request.blocks, schema) {
        (Some(blocks), _) => within_limit("blocks", blocks, options.max_payload_bytes, &mut diagnostics)
            .cloned()
            .unwrap_or_default(),
        (None, Some(schema)) if options.use_preset_blocks => blocks_from_preset(schema, 0),
        (None, _) => Vec::new(),
    };
    if blocks.len() > block_cap {
        diagnostics.push(Diagnostic::info(
            DiagnosticKind::BlocksTruncated,
            format!("{} blocks supplied, only the first {} are rendered", blocks.len(), block_cap),
        ));
        blocks.truncate(block_cap);
    }

    let pickers = schema.map(ResourcePickers::from_schema).unwrap_or_default();

    let body = strip_schema(source);
    let unrolled = unroll_block_loops(&body, &UnrollOptions { max_blocks: block_cap }, &pickers);
    for _ in 0..unrolled.skipped_nested {
        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::NestedBlockLoop,
            "Block loop contains another loop and was left as written",
        ));
    }
    let body = rewrite_block_count(&rewrite_section_settings(&unrolled.code, &pickers));
    let body = strip_image_filters(&body);

    let mut statements = Vec::new();
    collect(resource_assigns(&request.resources), DiagnosticKind::InvalidHandle, &mut statements, &mut diagnostics);
    collect(settings_assigns(&settings), DiagnosticKind::InvalidIdentifier, &mut statements, &mut diagnostics);
    collect(blocks_assigns(&blocks), DiagnosticKind::InvalidIdentifier, &mut statements, &mut diagnostics);

    let section_id = resolve_section_id(request.section_id.as_deref(), options);
    let mut markup = statements.join("\n");
    markup.push('\n');
    markup.push_str(&wrap(&body, &section_id, &options.container_class));

    PreviewOutput { markup, diagnostics }
}

fn collect(assigns: Assigns, kind: DiagnosticKind, statements: &mut Vec<String>, diagnostics: &mut Vec<Diagnostic>) {
    statements.extend(assigns.statements);
    diagnostics.extend(
        assigns
            .rejected
            .into_iter()
            .map(|key| Diagnostic::warning(kind, format!("Rejected {:?}", key))),
    );
}

fn within_limit<'a, T: Serialize>(
    what: &str,
    payload: &'a T,
    limit: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<&'a T> {
    let size = serde_json::to_string(payload).map(|json| json.len()).unwrap_or(usize::MAX);
    if size > limit {
        warn!("Dropping {} payload of {} bytes (limit {})", what, size, limit);
        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::PayloadTooLarge,
            format!("{} payload of {} bytes exceeds {} bytes and was ignored", what, size, limit),
        ));
        return None;
    }
    Some(payload)
}

fn resolve_section_id(requested: Option<&str>, options: &CompileOptions) -> String {
    let candidate = requested.unwrap_or(&options.section_id);
    if is_valid_section_id(candidate) {
        candidate.to_string()
    } else {
        debug!("Rejecting section id {:?}", candidate);
        DEFAULT_SECTION_ID.to_string()
    }
}

fn wrap(body: &str, section_id: &str, container_class: &str) -> String {
    let class = if is_valid_section_id(container_class) {
        container_class
    } else {
        DEFAULT_CONTAINER_CLASS
    };
    format!(
        "<div class=\"{class}\" id=\"shopify-section-{section_id}\">\n{body}\n</div>\n<style>\n\
         .{class} {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }}\n\
         .{class} img {{ max-width: 100%; height: auto; }}\n\
         </style>"
    )
}

/// Block instances for a preset, with each block's defaults filled in.
///
/// Preset values override the block type's defaults. Blocks past a type's
/// `limit` are dropped. Ids are `<type>-<n>`, `n` counting per type from 1.
/// When the schema has no presets, its `default` section is used.
pub fn blocks_from_preset(schema: &SchemaDefinition, preset_index: usize) -> Vec<BlockInstance> {
    let preset: Option<&SchemaPreset> = if schema.presets.is_empty() {
        schema.default.as_ref()
    } else {
        schema.presets.get(preset_index)
    };
    let Some(preset) = preset else {
        return Vec::new();
    };

    let mut per_type: HashMap<&str, u32> = HashMap::new();
    let mut instances = Vec::new();

    for preset_block in &preset.blocks {
        let declared = schema.block(&preset_block.block_type);
        let count = per_type.entry(preset_block.block_type.as_str()).or_insert(0);

        if let Some(limit) = declared.and_then(|b| b.limit) {
            if *count >= limit {
                debug!("Preset exceeds limit of {} for block type {:?}", limit, preset_block.block_type);
                continue;
            }
        }
        *count += 1;

        let mut settings = declared
            .map(|b| build_initial_state(&b.settings))
            .unwrap_or_default();
        for (key, value) in &preset_block.settings {
            settings.insert(key.clone(), value.clone());
        }

        instances.push(BlockInstance::new(
            format!("{}-{}", preset_block.block_type, count),
            preset_block.block_type.clone(),
            settings,
        ));
    }

    instances
}

/// Decodes a JSON settings object, rejecting oversized input.
pub fn try_decode_settings_payload(payload: &str, limit: usize) -> Result<SettingsState> {
    check_size(payload, limit)?;
    serde_json::from_str(payload).map_err(|e| SectionalError::Payload(format!("settings: {}", e)))
}

/// Decodes a JSON array of block instances, rejecting oversized input.
pub fn try_decode_blocks_payload(payload: &str, limit: usize) -> Result<Vec<BlockInstance>> {
    check_size(payload, limit)?;
    serde_json::from_str(payload).map_err(|e| SectionalError::Payload(format!("blocks: {}", e)))
}

/// Decodes a settings payload; oversized or malformed input yields an empty state.
pub fn decode_settings_payload(payload: &str, limit: usize) -> SettingsState {
    try_decode_settings_payload(payload, limit).unwrap_or_else(|e| {
        warn!("Ignoring settings payload: {}", e);
        SettingsState::new()
    })
}

/// Decodes a blocks payload; oversized or malformed input yields no blocks.
pub fn decode_blocks_payload(payload: &str, limit: usize) -> Vec<BlockInstance> {
    try_decode_blocks_payload(payload, limit).unwrap_or_else(|e| {
        warn!("Ignoring blocks payload: {}", e);
        Vec::new()
    })
}

fn check_size(payload: &str, limit: usize) -> Result<()> {
    if payload.len() > limit {
        return Err(SectionalError::PayloadTooLarge {
            size: payload.len(),
            limit,
        });
    }
    Ok(())
}
