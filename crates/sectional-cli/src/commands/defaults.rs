// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Defaults command: writes edited values back into the schema.

use super::{emit, read_settings, read_template};
use crate::config::Config;
use clap::Args;
use sectional::{update_schema_defaults_with_report, SchemaDefaultsUpdate};
use std::path::PathBuf;
use tracing::warn;

/// Arguments of `sectional defaults`.
#[derive(Debug, Clone, Args)]
pub struct DefaultsArgs {
    /// Section template to update
    pub template: PathBuf,
    /// JSON file with the values to store as defaults
    #[arg(long)]
    pub values: PathBuf,
    /// Rewrite the template in place instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

/// Applies the values file to the template's schema.
pub fn apply(args: &DefaultsArgs, config: &Config) -> anyhow::Result<SchemaDefaultsUpdate> {
    let source = read_template(&args.template)?;
    let values = read_settings(&args.values, config.preview.max_payload_bytes)?;
    Ok(update_schema_defaults_with_report(&source, &values))
}

/// Runs the defaults command.
pub fn run(args: DefaultsArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let update = apply(&args, &config)?;

    for id in &update.unsupported_settings {
        warn!("Setting {:?} picks a resource and cannot have a default", id);
        eprintln!("skipped: {} (resource setting)", id);
    }

    let target = args.write.then_some(args.template.as_path());
    emit(&update.code, target)
}
