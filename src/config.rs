use std::path::{Path, PathBuf};

use anyhow::Context;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

/// Secrets needed by the YouTube and Spotify clients. Read once at startup
/// and handed to each client's constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub youtube_api_key: String,
    pub spotify: SpotifyCredentials,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .with_context(|| format!("{} not set", key))
        };

        Ok(Self {
            youtube_api_key: required("YOUTUBE_API_KEY")?,
            spotify: SpotifyCredentials {
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                redirect_uri: lookup("SPOTIFY_REDIRECT_URI")
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            },
        })
    }
}

/// Options passed through to every yt-dlp invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpOptions {
    pub binary: PathBuf,
    pub cookies: PathBuf,
    pub archive: PathBuf,
    pub output: PathBuf,
    pub store_json: bool,
}

/// Expands a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
