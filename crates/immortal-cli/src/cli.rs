//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::account::AccountCommand;
use crate::commands::devices::DevicesCommand;
use crate::commands::memorial::MemorialCommand;
use crate::commands::photos::PhotosCommand;
use crate::commands::profile::ProfileCommand;
use crate::commands::traits::TraitsCommand;

/// The production API origin, used when neither `--api` nor
/// `IMMORTAL_API_URL` is set.
pub const DEFAULT_API_URL: &str = "https://immortal-api-production.up.railway.app";

/// Immortal memorial platform CLI.
#[derive(Parser, Debug)]
#[command(name = "immortal")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base origin (falls back to $IMMORTAL_API_URL, then production)
    #[arg(long, global = true)]
    pub api: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Account(AccountCommand),

    /// The profile document behind the memorial page
    Profile(ProfileCommand),

    /// Personality traits shown on the memorial page
    Traits(TraitsCommand),

    /// Biometric device connections
    Devices(DevicesCommand),

    /// Gallery photos
    Photos(PhotosCommand),

    /// Memorial page preferences
    Memorial(MemorialCommand),
}

/// Resolve the API origin: flag, then environment, then production.
pub fn resolve_api(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var("IMMORTAL_API_URL").ok())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}
