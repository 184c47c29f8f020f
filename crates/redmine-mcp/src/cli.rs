//! Command-line and environment configuration.

use clap::Parser;
use redmine::RedmineConfig;
use std::path::PathBuf;

/// MCP server for a Redmine instance.
///
/// Connection settings come from flags, the `REDMINE_URL` and
/// `REDMINE_API_KEY` environment variables, or a YAML file. Flags and
/// environment take precedence over the file.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "redmine-mcp", version, about)]
pub struct Cli {
    /// Base URL of the Redmine instance
    #[arg(long, env = "REDMINE_URL")]
    pub redmine_url: Option<String>,

    /// API key used to authenticate against Redmine
    #[arg(long, env = "REDMINE_API_KEY", hide_env_values = true)]
    pub redmine_api_key: Option<String>,

    /// YAML file providing `url` and `api_key`
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parse command-line arguments.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Resolve the Redmine connection settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, the URL or API
    /// key is missing, or validation fails.
    pub async fn resolve_config(&self) -> redmine::Result<RedmineConfig> {
        let from_file = match &self.config {
            Some(path) => Some(RedmineConfig::load(path).await?),
            None => None,
        };

        let url = self
            .redmine_url
            .clone()
            .or_else(|| from_file.as_ref().map(|c| c.url.clone()))
            .ok_or_else(|| {
                redmine::Error::Config("REDMINE_URL environment variable is required".to_string())
            })?;
        let api_key = self
            .redmine_api_key
            .clone()
            .or_else(|| from_file.map(|c| c.api_key))
            .ok_or_else(|| {
                redmine::Error::Config(
                    "REDMINE_API_KEY environment variable is required".to_string(),
                )
            })?;

        RedmineConfig::new(url, api_key)
    }
}
