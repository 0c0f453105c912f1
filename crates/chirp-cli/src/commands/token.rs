//! Token command implementation.

use anyhow::{Context, Result};
use clap::Args;

use chirp::{Config, Session};

use crate::output;

#[derive(Args, Debug)]
pub struct TokenArgs {
    /// Print the bearer token
    #[arg(long)]
    pub show: bool,
}

pub async fn run(config: Config, args: TokenArgs) -> Result<()> {
    let session = Session::new(config).context("Failed to create session")?;

    let token = session
        .authenticate()
        .await
        .context("Failed to obtain bearer token")?;

    output::success("Credentials accepted");
    output::field("API", session.base_url().as_str());
    output::field("Key", session.credentials().api_key());

    if args.show {
        output::field("Token", token.as_str());
    }

    Ok(())
}
