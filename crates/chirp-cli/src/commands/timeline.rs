//! Timeline command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use chirp::{Config, Session, UserTimelineOptions};

use crate::output;

#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Screen name of the user
    #[arg(long)]
    pub screen_name: Option<String>,

    /// Numeric ID of the user
    #[arg(long)]
    pub user_id: Option<u64>,

    /// Number of tweets to fetch
    #[arg(long)]
    pub count: Option<u32>,

    /// Only return tweets newer than this ID
    #[arg(long)]
    pub since_id: Option<u64>,

    /// Only return tweets at or older than this ID
    #[arg(long)]
    pub max_id: Option<u64>,

    /// Leave replies out (true/false)
    #[arg(long, value_name = "BOOL")]
    pub exclude_replies: Option<bool>,

    /// Include retweets (true/false)
    #[arg(long, value_name = "BOOL")]
    pub include_rts: Option<bool>,

    /// Only include the author's ID in each tweet (true/false)
    #[arg(long, value_name = "BOOL")]
    pub trim_user: Option<bool>,

    /// Print tweets as JSON, one per line
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    /// Print tweets as a pretty-printed JSON array
    #[arg(long)]
    pub pretty: bool,
}

impl TimelineArgs {
    fn options(&self) -> UserTimelineOptions {
        UserTimelineOptions {
            count: self.count,
            exclude_replies: self.exclude_replies,
            include_rts: self.include_rts,
            max_id: self.max_id,
            screen_name: self.screen_name.clone(),
            since_id: self.since_id,
            trim_user: self.trim_user,
            user_id: self.user_id,
        }
    }
}

pub async fn run(config: Config, args: TimelineArgs) -> Result<()> {
    if args.screen_name.is_none() && args.user_id.is_none() {
        bail!("Pass --screen-name or --user-id");
    }

    let session = Session::new(config).context("Failed to create session")?;

    let tweets = session
        .user_timeline(&args.options())
        .await
        .context("Failed to fetch timeline")?;

    if args.pretty {
        return output::json_pretty(&tweets);
    }

    if tweets.is_empty() && !args.json {
        eprintln!("{}", "No tweets found.".dimmed());
        return Ok(());
    }

    for tweet in &tweets {
        if args.json {
            output::json(tweet)?;
        } else {
            output::tweet(tweet);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_flags_to_options() {
        let args = TimelineArgs {
            screen_name: Some("acme".to_string()),
            user_id: None,
            count: Some(5),
            since_id: None,
            max_id: Some(99),
            exclude_replies: Some(true),
            include_rts: None,
            trim_user: None,
            json: false,
            pretty: false,
        };

        let options = args.options();
        assert_eq!(
            options.to_query_string(),
            "count=5&exclude_replies=true&max_id=99&screen_name=acme"
        );
    }
}
