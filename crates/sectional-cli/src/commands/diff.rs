// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Diff command: prints values that differ from the schema defaults.

use super::{emit, read_settings, read_template};
use crate::config::Config;
use clap::Args;
use sectional::{parse_schema, settings_diff, SettingsState};
use std::path::PathBuf;

/// Arguments of `sectional diff`.
#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Section template whose schema holds the defaults
    pub template: PathBuf,
    /// JSON file with the current values
    #[arg(long)]
    pub values: PathBuf,
}

/// Values from the file that differ from the schema's effective defaults.
pub fn changed_values(args: &DiffArgs, config: &Config) -> anyhow::Result<SettingsState> {
    let source = read_template(&args.template)?;
    let values = read_settings(&args.values, config.preview.max_payload_bytes)?;
    Ok(settings_diff(parse_schema(&source).as_ref(), &values))
}

/// Runs the diff command.
pub fn run(args: DiffArgs) -> anyhow::Result<()> {
    let config = Config::load()?;
    let diff = changed_values(&args, &config)?;
    emit(&serde_json::to_string_pretty(&diff)?, None)
}
