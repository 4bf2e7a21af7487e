//! Configuration module for the whistleblower.
//!
//! This module reads the Twitter credentials, the MongoDB location and the
//! profiles file path from environment variables.

use log::{debug, error, info, warn};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::oauth::OAuthCredentials;

pub const DEFAULT_MONGO_URL: &str = "mongodb://mongo:27017/";
pub const DEFAULT_MONGO_DATABASE: &str = "whistleblower";
pub const DEFAULT_PROFILES_FILE: &str = "data/twitter_profiles.csv";
pub const DEFAULT_SCREEN_NAME: &str = "RosieDaSerenata";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration for the Twitter target.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth 1.0a consumer and access token pairs
    pub credentials: OAuthCredentials,
    /// MongoDB connection string
    pub mongo_url: String,
    /// Database holding the `posts` collection
    pub mongo_database: String,
    /// CSV with the congresspeople's Twitter handles
    pub profiles_file: PathBuf,
    /// Account whose timeline is used to provision the database
    pub screen_name: String,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
}

/// Masks a secret for logging, keeping only a short prefix and suffix.
pub(crate) fn mask_secret(secret: &str) -> String {
    let length = secret.chars().count();
    let prefix: String = secret.chars().take(4).collect();
    if length > 16 {
        let suffix: String = secret.chars().skip(length - 4).collect();
        format!("{}...{}", prefix, suffix)
    } else {
        format!("{}...", prefix)
    }
}

impl Config {
    /// Creates a new `Config` from the process environment.
    ///
    /// # Required Environment Variables
    ///
    /// - `TWITTER_CONSUMER_KEY`
    /// - `TWITTER_CONSUMER_SECRET`
    /// - `TWITTER_ACCESS_TOKEN_KEY`
    /// - `TWITTER_ACCESS_TOKEN_SECRET`
    ///
    /// # Optional Environment Variables
    ///
    /// - `MONGO_URL`: defaults to `mongodb://mongo:27017/`
    /// - `MONGO_DATABASE`: defaults to `whistleblower`
    /// - `PROFILES_FILE`: defaults to `data/twitter_profiles.csv`
    /// - `TWITTER_SCREEN_NAME`: defaults to `RosieDaSerenata`
    /// - `HTTP_TIMEOUT_SECS`: defaults to 30
    ///
    /// # Returns
    ///
    /// - `Ok(Config)`: If every required secret is present and not empty
    /// - `Err(Error::Config)`: If a secret is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading whistleblower configuration from environment variables");

        let secret = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => {
                    info!("Found {} environment variable with length: {}", key, value.len());
                    debug!("{} (masked): {}", key, mask_secret(&value));
                    Ok(value)
                }
                Some(_) => {
                    error!("{} is empty", key);
                    Err(Error::Config(format!("{} cannot be empty", key)))
                }
                None => {
                    error!("Make sure {} environment variable is set", key);
                    Err(Error::Config(format!("missing {} environment variable", key)))
                }
            }
        };

        let credentials = OAuthCredentials {
            consumer_key: secret("TWITTER_CONSUMER_KEY")?,
            consumer_secret: secret("TWITTER_CONSUMER_SECRET")?,
            access_token_key: secret("TWITTER_ACCESS_TOKEN_KEY")?,
            access_token_secret: secret("TWITTER_ACCESS_TOKEN_SECRET")?,
        };

        let with_default = |key: &str, default: &str| -> String {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => value,
                _ => {
                    info!("No {} found, using default: {}", key, default);
                    default.to_string()
                }
            }
        };

        let mongo_url = with_default("MONGO_URL", DEFAULT_MONGO_URL);
        let mongo_database = with_default("MONGO_DATABASE", DEFAULT_MONGO_DATABASE);
        let profiles_file = PathBuf::from(with_default("PROFILES_FILE", DEFAULT_PROFILES_FILE));
        let screen_name = with_default("TWITTER_SCREEN_NAME", DEFAULT_SCREEN_NAME);

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    Error::Config(format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))
                })?;
                if secs == 0 {
                    warn!("HTTP_TIMEOUT_SECS is 0, outbound requests will fail immediately");
                }
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        debug!(
            "MongoDB URL (masked): {}...",
            mongo_url.chars().take(20).collect::<String>()
        );
        info!(
            "Configuration loaded: database '{}', profiles '{}', account @{}",
            mongo_database,
            profiles_file.display(),
            screen_name
        );

        Ok(Config {
            credentials,
            mongo_url,
            mongo_database,
            profiles_file,
            screen_name,
            http_timeout,
        })
    }
}
