//! Redmine MCP server binary.
//!
//! This binary runs the MCP server using stdio transport. Logs go to stderr
//! because stdout carries the protocol.

use redmine::RedmineClient;
use redmine_mcp::RedmineMcpServer;
use redmine_mcp::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Can be controlled via RUST_LOG, e.g. RUST_LOG=redmine=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("redmine=info,redmine_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();
    let config = cli.resolve_config().await?;
    tracing::info!(url = %config.url, "Starting redmine-mcp server");

    let client = RedmineClient::new(&config)?;
    RedmineMcpServer::new(client).run().await?;

    Ok(())
}
