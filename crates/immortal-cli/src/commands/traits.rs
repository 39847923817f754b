//! Personality trait commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use immortal_core::{ApiUrl, TraitSelection};

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct TraitsCommand {
    #[command(subcommand)]
    pub command: TraitsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TraitsSubcommand {
    /// List the traits attached to the profile
    List(ListArgs),

    /// List the platform's default trait choices
    Defaults(DefaultsArgs),

    /// Replace the trait selection
    Set(SetArgs),
}

pub async fn handle(api: ApiUrl, cmd: TraitsCommand) -> Result<()> {
    match cmd.command {
        TraitsSubcommand::List(args) => list(api, args).await,
        TraitsSubcommand::Defaults(args) => defaults(api, args).await,
        TraitsSubcommand::Set(args) => set(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {}

async fn list(api: ApiUrl, _args: ListArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let traits = ctx
        .session
        .traits()
        .await
        .context("Failed to fetch traits")?;

    if traits.is_empty() {
        println!("No traits selected.");
    }

    for entry in traits {
        if entry.is_custom {
            println!("{} {}", entry.trait_name, "(custom)".dimmed());
        } else {
            println!("{}", entry.trait_name);
        }
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct DefaultsArgs {}

async fn defaults(api: ApiUrl, _args: DefaultsArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let defaults = ctx
        .session
        .default_traits()
        .await
        .context("Failed to fetch default traits")?;

    for name in defaults.traits {
        println!("{}", name);
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// A trait from the default list (repeatable)
    #[arg(long = "trait", value_name = "NAME")]
    pub traits: Vec<String>,

    /// A trait in the user's own words (repeatable)
    #[arg(long = "custom", value_name = "NAME")]
    pub custom: Vec<String>,
}

async fn set(api: ApiUrl, args: SetArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let selection = TraitSelection {
        traits: args.traits,
        custom_traits: args.custom,
    };

    let count = selection.traits.len() + selection.custom_traits.len();

    ctx.session
        .set_traits(&selection)
        .await
        .context("Failed to set traits")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success(&format!("Saved {} trait(s)", count));

    Ok(())
}
