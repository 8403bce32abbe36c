// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

// Warn on missing documentation for public items
#![warn(missing_docs)]

//! Sectional CLI library.
//!
//! This crate provides the command-line interface for the Sectional section
//! compiler. It reads section templates from disk and drives the library's
//! preview compiler and schema tools.
//!
//! # Usage
//!
//! This crate is primarily used through the `sectional` binary:
//!
//! ```bash
//! sectional preview sections/hero.liquid         # Flat preview markup
//! sectional schema sections/hero.liquid --defaults
//! sectional defaults sections/hero.liquid --values values.json --write
//! sectional diff sections/hero.liquid --values values.json
//! ```
//!
//! # Configuration
//!
//! Compile options are read from `sectional.toml` in the working directory.

/// CLI commands (preview, schema, defaults, diff).
pub mod commands;
/// Compile configuration from `sectional.toml`.
pub mod config;
