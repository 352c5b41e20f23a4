// SPDX-FileCopyrightText: 2026 Bazaar Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bazaar - a Telegram bot that collects marketplace listings and routes
//! them through moderation.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod serve;
mod shutdown;

use std::path::{Path, PathBuf};

use bazaar_config::{BazaarConfig, ConfigError};
use bazaar_core::BazaarError;
use clap::{Parser, Subcommand};

/// Bazaar - listing submission and moderation bot.
#[derive(Parser, Debug)]
#[command(name = "bazaar", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Commands {
    /// Run the bot until SIGINT or SIGTERM (default).
    Serve,
    /// Validate configuration and check that Telegram is reachable.
    Check,
    /// Print the resolved configuration with secrets redacted.
    Config,
}

fn load(path: Option<&Path>) -> Result<BazaarConfig, Vec<ConfigError>> {
    match path {
        Some(path) => bazaar_config::load_and_validate_path(path),
        None => bazaar_config::load_and_validate(),
    }
}

fn print_config(config: &BazaarConfig) -> Result<(), BazaarError> {
    let rendered = config
        .to_redacted_toml()
        .map_err(|e| BazaarError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

#[tokio::main]
async fn main() {
    // A missing .env file is normal outside development.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            bazaar_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Check => check::run_check(&config).await,
        Commands::Config => print_config(&config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
