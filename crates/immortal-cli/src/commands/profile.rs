//! Profile document commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use immortal_core::ApiUrl;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct ProfileCommand {
    #[command(subcommand)]
    pub command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileSubcommand {
    /// Display the profile document
    Show(ShowArgs),

    /// Update fields of the profile document
    Update(UpdateArgs),
}

pub async fn handle(api: ApiUrl, cmd: ProfileCommand) -> Result<()> {
    match cmd.command {
        ProfileSubcommand::Show(args) => show(api, args).await,
        ProfileSubcommand::Update(args) => update(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the raw JSON document
    #[arg(long)]
    pub json: bool,
}

async fn show(api: ApiUrl, args: ShowArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let profile = ctx
        .session
        .profile()
        .await
        .context("Failed to fetch profile")?;

    if args.json {
        output::json_pretty(&profile)?;
    } else {
        output::opt_field("First name", profile.first_name.as_deref());
        output::opt_field("Last name", profile.last_name.as_deref());
        output::opt_field("Date of birth", profile.date_of_birth.as_deref());
        output::opt_field("Place of birth", profile.place_of_birth.as_deref());
        output::opt_field("Personal statement", profile.personal_statement.as_deref());
        output::opt_field("Remember statement", profile.remember_statement.as_deref());
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    /// ISO date, e.g. 1912-06-23
    #[arg(long)]
    pub date_of_birth: Option<String>,

    #[arg(long)]
    pub place_of_birth: Option<String>,

    #[arg(long)]
    pub personal_statement: Option<String>,

    #[arg(long)]
    pub remember_statement: Option<String>,
}

async fn update(api: ApiUrl, args: UpdateArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    // Overlay the provided fields on the current document; the PUT
    // replaces it wholesale.
    let mut profile = ctx
        .session
        .profile()
        .await
        .context("Failed to fetch profile")?;

    if args.first_name.is_some() {
        profile.first_name = args.first_name;
    }
    if args.last_name.is_some() {
        profile.last_name = args.last_name;
    }
    if args.date_of_birth.is_some() {
        profile.date_of_birth = args.date_of_birth;
    }
    if args.place_of_birth.is_some() {
        profile.place_of_birth = args.place_of_birth;
    }
    if args.personal_statement.is_some() {
        profile.personal_statement = args.personal_statement;
    }
    if args.remember_statement.is_some() {
        profile.remember_statement = args.remember_statement;
    }

    ctx.session
        .update_profile(&profile)
        .await
        .context("Failed to update profile")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success("Profile updated");

    Ok(())
}
