//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use chirp::Tweet;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a tweet as a timestamped line, followed by its expanded URLs.
pub fn tweet(tweet: &Tweet) {
    println!(
        "{} {} {}",
        tweet.created_at.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
        tweet.id.to_string().cyan(),
        tweet.text
    );
    for url in &tweet.entities.urls {
        println!("    {} {}", "↳".dimmed(), url.expanded_url);
    }
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
