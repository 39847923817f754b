//! Biometric device commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use immortal_core::ApiUrl;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct DevicesCommand {
    #[command(subcommand)]
    pub command: DevicesSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DevicesSubcommand {
    /// List devices and their connection state
    List(ListArgs),

    /// Connect (or re-sync) a device
    Connect(ConnectArgs),

    /// Display aggregated health stats
    Stats(StatsArgs),
}

pub async fn handle(api: ApiUrl, cmd: DevicesCommand) -> Result<()> {
    match cmd.command {
        DevicesSubcommand::List(args) => list(api, args).await,
        DevicesSubcommand::Connect(args) => connect(api, args).await,
        DevicesSubcommand::Stats(args) => stats(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {}

async fn list(api: ApiUrl, _args: ListArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let devices = ctx
        .session
        .devices()
        .await
        .context("Failed to fetch devices")?;

    if devices.is_empty() {
        println!("No devices available.");
    }

    for device in devices {
        let state = if device.connected {
            "connected".green()
        } else {
            "not connected".dimmed()
        };
        println!("{}: {}", device.device_type, state);
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct ConnectArgs {
    /// Device identifier, e.g. "whoop", "apple", "garmin", "fitbit"
    #[arg(long)]
    pub device_type: String,
}

async fn connect(api: ApiUrl, args: ConnectArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    eprintln!("{}", "Connecting device...".dimmed());

    ctx.session
        .connect_device(&args.device_type)
        .await
        .context("Failed to connect device")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success(&format!("{} connected", args.device_type));

    Ok(())
}

#[derive(Args, Debug)]
pub struct StatsArgs {}

async fn stats(api: ApiUrl, _args: StatsArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    match ctx
        .session
        .health_stats()
        .await
        .context("Failed to fetch health stats")?
    {
        Some(stats) => {
            output::field("Average sleep", &format!("{:.1} h", stats.avg_sleep));
            output::field("Recovery score", &format!("{:.0}", stats.recovery_score));
            output::field("Resting HR", &format!("{:.0} bpm", stats.resting_hr));
        }
        None => println!("No stats yet. Connect a device first."),
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}
