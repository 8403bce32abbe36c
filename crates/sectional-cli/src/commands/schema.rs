// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Schema command: prints a section's schema or its default settings state.

use super::{emit, read_template};
use clap::Args;
use sectional::{build_initial_state, extract_settings, schema_diagnostics, try_parse_schema};
use std::path::PathBuf;

/// Arguments of `sectional schema`.
#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    /// Section template to inspect
    pub template: PathBuf,
    /// Print the default settings state instead of the schema
    #[arg(long)]
    pub defaults: bool,
    /// Keep translation keys instead of resolving them to labels
    #[arg(long)]
    pub raw: bool,
}

/// Renders the schema (or default state) of the template as pretty JSON.
pub fn render(args: &SchemaArgs) -> anyhow::Result<String> {
    let source = read_template(&args.template)?;
    let Some(schema) = try_parse_schema(&source)? else {
        anyhow::bail!("no schema block in {}", args.template.display());
    };

    for diagnostic in schema_diagnostics(&schema) {
        eprintln!("{}", diagnostic);
    }

    let json = if args.defaults {
        serde_json::to_string_pretty(&build_initial_state(&extract_settings(&schema)))?
    } else if args.raw {
        serde_json::to_string_pretty(&schema)?
    } else {
        serde_json::to_string_pretty(&schema.resolve_labels())?
    };
    Ok(json)
}

/// Runs the schema command.
pub fn run(args: SchemaArgs) -> anyhow::Result<()> {
    emit(&render(&args)?, None)
}
