//! manual-server - builds markdown manuals into a static site and serves
//! them with per-client language negotiation.

mod cli;
mod compiler;
mod config;
mod core;
mod language;
mod logger;
mod output;
mod router;
mod source;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, build::build_manuals, serve::serve_manuals};
use config::{ManualConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = init_config(ManualConfig::load(&cli)?);

    match &cli.command {
        Commands::Build { .. } => build_manuals(&config).map(|_| ()),
        Commands::Serve { .. } => {
            build_manuals(&config)?;
            serve_manuals()
        }
    }
}
