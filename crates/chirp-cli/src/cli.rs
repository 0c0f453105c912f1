//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::commands::{timeline::TimelineArgs, token::TokenArgs};

/// Twitter API CLI tool using application-only authentication.
#[derive(Parser, Debug)]
#[command(name = "chirp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings shared by every command.
///
/// Each one overrides the matching entry of the config file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Path to the config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// API key (consumer key)
    #[arg(long, global = true, env = "CHIRP_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API secret (consumer secret)
    #[arg(long, global = true, env = "CHIRP_API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "CHIRP_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a user's timeline
    Timeline(TimelineArgs),

    /// Request a bearer token to check the credentials
    Token(TokenArgs),
}
