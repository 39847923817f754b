//! immortal - CLI for the Immortal memorial platform.
//!
//! A thin wrapper over the `immortal-client` library for managing an
//! account, its onboarding profile, and memorial preferences from the
//! terminal.

mod cli;
mod commands;
mod output;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use immortal_core::ApiUrl;

use cli::{Cli, Commands};
use commands::{account, devices, memorial, photos, profile, traits};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.json_logs);

    let api = ApiUrl::new(cli::resolve_api(cli.api)).context("Invalid API URL")?;

    match cli.command {
        Commands::Account(cmd) => account::handle(api, cmd).await,
        Commands::Profile(cmd) => profile::handle(api, cmd).await,
        Commands::Traits(cmd) => traits::handle(api, cmd).await,
        Commands::Devices(cmd) => devices::handle(api, cmd).await,
        Commands::Photos(cmd) => photos::handle(api, cmd).await,
        Commands::Memorial(cmd) => memorial::handle(api, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false))
            .init();
    }
}
