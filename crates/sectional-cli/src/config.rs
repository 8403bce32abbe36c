// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! Sectional configuration.
//!
//! Configuration is loaded from `sectional.toml` in the working directory.
//!
//! # Example Configuration
//!
//! ```toml
//! [preview]
//! max_blocks = 10
//! max_payload_bytes = 4096
//! container_class = "sectional-preview"
//! section_id = "preview"
//! use_preset_blocks = true
//! ```

use anyhow::Context;
use sectional::CompileOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "sectional.toml";

/// Main configuration structure loaded from `sectional.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Preview compiler settings.
    #[serde(default)]
    pub preview: CompileOptions,
}

impl Config {
    /// Loads configuration from `sectional.toml` in the current directory.
    ///
    /// If no configuration file exists, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed
    /// or holds unusable values.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Loads configuration from an explicit path, with the same fallback.
    pub fn load_from(config_path: &Path) -> anyhow::Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", config_path.display()))?;
        config.preview.validate()?;
        Ok(config)
    }
}
