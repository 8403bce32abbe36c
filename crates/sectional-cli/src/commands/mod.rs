// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `preview`: Compile a section into flat preview markup
//! - `schema`: Print the parsed schema or its default settings state
//! - `defaults`: Write values back into the schema as defaults
//! - `diff`: Print the values that differ from the schema defaults

/// Schema default editing command.
pub mod defaults;
/// Settings diff command.
pub mod diff;
/// Preview compilation command.
pub mod preview;
/// Schema inspection command.
pub mod schema;

use anyhow::Context;
use sectional::{try_decode_settings_payload, SettingsState};
use std::fs;
use std::path::Path;

/// Reads a section template.
pub(crate) fn read_template(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading template {}", path.display()))
}

/// Reads a JSON settings object, enforcing the payload limit.
pub(crate) fn read_settings(path: &Path, limit: usize) -> anyhow::Result<SettingsState> {
    let payload = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    try_decode_settings_payload(&payload, limit).with_context(|| format!("decoding {}", path.display()))
}

/// Writes `content` to `path`, or to stdout when no path is given.
pub(crate) fn emit(content: &str, path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
