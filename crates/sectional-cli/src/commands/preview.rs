// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Preview command: compiles a section template into flat preview markup.

use super::{emit, read_settings, read_template};
use crate::config::Config;
use anyhow::Context;
use clap::Args;
use sectional::{compile_preview, try_decode_blocks_payload, PreviewOutput, PreviewRequest, ResourceContext};
use std::fs;
use std::path::PathBuf;

/// Arguments of `sectional preview`.
#[derive(Debug, Clone, Args)]
pub struct PreviewArgs {
    /// Section template to compile
    pub template: PathBuf,
    /// JSON file with the settings state (defaults to the schema defaults)
    #[arg(long)]
    pub settings: Option<PathBuf>,
    /// JSON file with the block instances (defaults to the first preset)
    #[arg(long)]
    pub blocks: Option<PathBuf>,
    /// Product handle bound to `product`
    #[arg(long)]
    pub product: Option<String>,
    /// Collection handle bound to `collection`
    #[arg(long)]
    pub collection: Option<String>,
    /// Section id of the wrapping container
    #[arg(long)]
    pub section_id: Option<String>,
    /// Print markup and diagnostics as JSON
    #[arg(long)]
    pub json: bool,
    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Compiles the template named by `args`.
pub fn compile(args: &PreviewArgs, config: &Config) -> anyhow::Result<PreviewOutput> {
    let source = read_template(&args.template)?;
    let limit = config.preview.max_payload_bytes;

    let settings = args
        .settings
        .as_deref()
        .map(|path| read_settings(path, limit))
        .transpose()?;
    let blocks = match &args.blocks {
        Some(path) => {
            let payload = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            let blocks = try_decode_blocks_payload(&payload, limit)
                .with_context(|| format!("decoding {}", path.display()))?;
            Some(blocks)
        }
        None => None,
    };

    let request = PreviewRequest {
        settings,
        blocks,
        resources: ResourceContext {
            product_handle: args.product.clone(),
            collection_handle: args.collection.clone(),
        },
        section_id: args.section_id.clone(),
    };

    Ok(compile_preview(&source, &request, &config.preview))
}

/// Runs the preview command.
pub fn run(args: PreviewArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let output = compile(&args, &config)?;

    if args.json {
        return emit(&serde_json::to_string_pretty(&output)?, args.output.as_deref());
    }

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
    }
    emit(&output.markup, args.output.as_deref())
}
