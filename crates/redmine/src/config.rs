//! Connection settings for a Redmine instance.
//!
//! A [`RedmineConfig`] is built once at startup and handed to
//! [`RedmineClient::new`](crate::client::RedmineClient::new). Request code never
//! reads the environment or the filesystem.

use crate::error::{Error, Result};
use reqwest::Url;
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tokio::fs;

/// Redmine base URL and API key.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct RedmineConfig {
    /// Base URL of the Redmine instance, without a trailing slash.
    pub url: String,

    /// API key sent with every request.
    pub api_key: String,
}

impl RedmineConfig {
    /// Build a validated configuration.
    ///
    /// A single trailing `/` is stripped from `url`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the key is empty or the URL is not an
    /// absolute `http`/`https` URL.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let config = Self {
            url: url.into(),
            api_key: api_key.into(),
        };
        config.validated()
    }

    /// Load configuration from a YAML file with `url` and `api_key` keys.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file cannot be read, is not valid YAML,
    /// or fails validation.
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
        let config: Self = serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("invalid {}: {e}", path.display())))?;
        config.validated()
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL does not parse.
    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.url).map_err(|e| Error::Config(format!("invalid Redmine URL: {e}")))
    }

    fn validated(mut self) -> Result<Self> {
        if let Some(trimmed) = self.url.strip_suffix('/') {
            self.url = trimmed.to_string();
        }
        if self.url.trim().is_empty() {
            return Err(Error::Config("Redmine URL must not be empty".to_string()));
        }
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("Redmine API key must not be empty".to_string()));
        }

        let url = self.base_url()?;
        if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "Redmine URL must be an http(s) base URL: {}",
                self.url
            )));
        }

        Ok(self)
    }
}

impl fmt::Debug for RedmineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedmineConfig")
            .field("url", &self.url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
