//! Account and session commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use immortal_core::{ApiUrl, Credentials, RegisterPayload};

use crate::output;
use crate::session::{CliContext, storage};

#[derive(Args, Debug)]
pub struct AccountCommand {
    #[command(subcommand)]
    pub command: AccountSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AccountSubcommand {
    /// Create a new account and log into it
    Register(RegisterArgs),

    /// Create a new session (login)
    Login(LoginArgs),

    /// End the session and clear the stored cookie
    Logout(LogoutArgs),

    /// Display the active account
    Whoami(WhoamiArgs),
}

pub async fn handle(api: ApiUrl, cmd: AccountCommand) -> Result<()> {
    match cmd.command {
        AccountSubcommand::Register(args) => register(api, args).await,
        AccountSubcommand::Login(args) => login(api, args).await,
        AccountSubcommand::Logout(args) => logout(api, args).await,
        AccountSubcommand::Whoami(args) => whoami(api, args).await,
    }
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Full display name
    #[arg(long)]
    pub full_name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Defaults to the password when omitted
    #[arg(long)]
    pub confirm_password: Option<String>,

    /// Who the page is for: "myself" or "loved_one"
    #[arg(long, default_value = "myself")]
    pub intent: String,

    /// Agree to the platform's data handling terms
    #[arg(long)]
    pub consent: bool,
}

async fn register(api: ApiUrl, args: RegisterArgs) -> Result<()> {
    let ctx = CliContext::open(api)?;

    eprintln!("{}", "Creating account...".dimmed());

    let confirm_password = args
        .confirm_password
        .unwrap_or_else(|| args.password.clone());

    let user = ctx
        .session
        .register(RegisterPayload {
            full_name: args.full_name,
            email: args.email,
            password: args.password,
            confirm_password,
            intent: args.intent,
            consent: args.consent,
        })
        .await
        .context("Failed to register")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success("Account created");
    println!();
    output::field("User", &user.full_name);
    output::field("Email", &user.email);

    Ok(())
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub password: String,

    /// Ask for a session-scoped refresh cookie instead of a remembered one
    #[arg(long)]
    pub no_remember: bool,
}

async fn login(api: ApiUrl, args: LoginArgs) -> Result<()> {
    let ctx = CliContext::open(api)?;

    eprintln!("{}", "Logging in...".dimmed());

    let credentials = Credentials::new(&args.email, &args.password).remember(!args.no_remember);
    let user = ctx
        .session
        .login(credentials)
        .await
        .context("Failed to login")?;

    ctx.save().context("Failed to save cookie store")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &user.full_name);
    output::field("Email", &user.email);

    Ok(())
}

#[derive(Args, Debug)]
pub struct LogoutArgs {}

async fn logout(api: ApiUrl, _args: LogoutArgs) -> Result<()> {
    let ctx = CliContext::open(api)?;

    // The server call is best-effort; local cleanup happens regardless.
    ctx.session.logout().await;
    storage::clear().context("Failed to clear cookie store")?;

    output::success("Logged out");

    Ok(())
}

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

async fn whoami(api: ApiUrl, _args: WhoamiArgs) -> Result<()> {
    let ctx = CliContext::open(api)?;

    let user = ctx
        .session
        .restore()
        .await
        .context("No active session. Run 'immortal account login' first.")?;

    output::field("User", &user.full_name);
    output::field("Email", &user.email);
    output::field("Intent", &user.intent);
    output::field("Member since", &user.created_at.format("%Y-%m-%d").to_string());

    ctx.save().context("Failed to save cookie store")?;

    Ok(())
}
