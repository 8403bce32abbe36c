// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};
use sectional_cli::commands;
use sectional_cli::commands::defaults::DefaultsArgs;
use sectional_cli::commands::diff::DiffArgs;
use sectional_cli::commands::preview::PreviewArgs;
use sectional_cli::commands::schema::SchemaArgs;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sectional")]
#[command(author = "Maravilla Labs")]
#[command(version)]
#[command(about = "Section schema compiler and Liquid flattening transpiler", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a section into flat preview markup
    Preview(PreviewArgs),
    /// Print the parsed schema or its default settings
    Schema(SchemaArgs),
    /// Store values as the schema's defaults
    Defaults(DefaultsArgs),
    /// Print values that differ from the schema's defaults
    Diff(DiffArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with the specified log level
    let filter = EnvFilter::try_new(&cli.log_level)
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Preview(args) => commands::preview::run(args),
        Commands::Schema(args) => commands::schema::run(args),
        Commands::Defaults(args) => commands::defaults::run(args),
        Commands::Diff(args) => commands::diff::run(args),
    }
}
