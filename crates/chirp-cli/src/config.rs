//! Configuration loading.
//!
//! Settings come from a TOML file, overridden by environment variables and
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::Deserialize;

use chirp::{ApiUrl, Config, SenderOptions};

use crate::cli::GlobalArgs;

/// Contents of the config file. Every entry is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    api_secret: Option<String>,
    base_url: Option<ApiUrl>,
    #[serde(default)]
    sender: SenderOptions,
}

/// Default config file location, e.g. `~/.config/chirp/config.toml`.
fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "chirp").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_file(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("Invalid config file {}", path.display()))
}

/// Build the library configuration from the config file and the flags.
///
/// An explicit `--config` path must exist; the default one is optional.
pub fn resolve(args: &GlobalArgs) -> Result<Config> {
    let (path, file) = match &args.config {
        Some(path) => (Some(path.clone()), load_file(path)?),
        None => match default_config_path() {
            Some(path) if path.exists() => {
                let file = load_file(&path)?;
                (Some(path), file)
            }
            other => (other, FileConfig::default()),
        },
    };

    tracing::debug!(path = ?path, "Resolved config file");

    let api_key = args.api_key.clone().or(file.api_key);
    let api_secret = args.api_secret.clone().or(file.api_secret);

    let (Some(api_key), Some(api_secret)) = (api_key, api_secret) else {
        let location = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the config file".to_string());
        bail!(
            "Missing API credentials. Set api_key and api_secret in {location}, \
             export CHIRP_API_KEY and CHIRP_API_SECRET, or pass --api-key and --api-secret."
        );
    };

    let base_url = match &args.base_url {
        Some(url) => ApiUrl::new(url).context("Invalid --base-url")?,
        None => file.base_url.unwrap_or_default(),
    };

    Ok(Config::new(api_key, api_secret)
        .with_base_url(base_url)
        .with_sender(file.sender))
}
