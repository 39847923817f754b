//! Memorial preference commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use immortal_core::ApiUrl;

use crate::output;
use crate::session::CliContext;

#[derive(Args, Debug)]
pub struct MemorialCommand {
    #[command(subcommand)]
    pub command: MemorialSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MemorialSubcommand {
    /// Display the memorial page preferences
    Show(ShowArgs),

    /// Update the memorial page preferences
    Update(UpdateArgs),
}

pub async fn handle(api: ApiUrl, cmd: MemorialCommand) -> Result<()> {
    match cmd.command {
        MemorialSubcommand::Show(args) => show(api, args).await,
        MemorialSubcommand::Update(args) => update(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Print the raw JSON document
    #[arg(long)]
    pub json: bool,
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

async fn show(api: ApiUrl, args: ShowArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    let prefs = ctx
        .session
        .memorial_preferences()
        .await
        .context("Failed to fetch memorial preferences")?;

    if args.json {
        output::json_pretty(&prefs)?;
    } else {
        output::field("Anniversary posts", on_off(prefs.anniversary_posts));
        output::field("Birthday remembrance", on_off(prefs.birthday_remembrance));
        output::field("Public biometrics", on_off(prefs.biometric_public));
        output::field("Family memories", on_off(prefs.family_memories));
        output::opt_field("Guardian", prefs.guardian_name.as_deref());
        output::opt_field("Guardian email", prefs.guardian_email.as_deref());
        output::opt_field("Final message", prefs.final_message.as_deref());
    }

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Post a remembrance on the anniversary of passing
    #[arg(long, value_name = "BOOL")]
    pub anniversary_posts: Option<bool>,

    /// Post a remembrance on the person's birthday
    #[arg(long, value_name = "BOOL")]
    pub birthday_remembrance: Option<bool>,

    /// Show biometric history on the public page
    #[arg(long, value_name = "BOOL")]
    pub biometric_public: Option<bool>,

    /// Allow family members to contribute memories
    #[arg(long, value_name = "BOOL")]
    pub family_memories: Option<bool>,

    #[arg(long)]
    pub guardian_name: Option<String>,

    #[arg(long)]
    pub guardian_email: Option<String>,

    /// A final message revealed on the memorial page
    #[arg(long)]
    pub final_message: Option<String>,
}

async fn update(api: ApiUrl, args: UpdateArgs) -> Result<()> {
    let ctx = CliContext::authenticated(api).await?;

    // Overlay the provided fields on the current document; the PUT
    // replaces it wholesale.
    let mut prefs = ctx
        .session
        .memorial_preferences()
        .await
        .context("Failed to fetch memorial preferences")?;

    if let Some(value) = args.anniversary_posts {
        prefs.anniversary_posts = value;
    }
    if let Some(value) = args.birthday_remembrance {
        prefs.birthday_remembrance = value;
    }
    if let Some(value) = args.biometric_public {
        prefs.biometric_public = value;
    }
    if let Some(value) = args.family_memories {
        prefs.family_memories = value;
    }
    if args.guardian_name.is_some() {
        prefs.guardian_name = args.guardian_name;
    }
    if args.guardian_email.is_some() {
        prefs.guardian_email = args.guardian_email;
    }
    if args.final_message.is_some() {
        prefs.final_message = args.final_message;
    }

    ctx.session
        .update_memorial_preferences(&prefs)
        .await
        .context("Failed to update memorial preferences")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success("Memorial preferences updated");

    Ok(())
}
