//! MCP server implementation.
//!
//! This module contains the main server setup using rmcp. Failed operations
//! are returned as tool results flagged as errors, so the calling agent sees
//! the message; protocol errors are reserved for serialization failures.

use crate::models::{GetIssueParams, ListProjectMembersParams, UpdateIssueParams};
use crate::tools::Tools;
use redmine::{IssueTracker, RedmineClient};
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{
    ErrorData as McpError, ServiceExt, handler::server::ServerHandler, tool, tool_handler,
    tool_router,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// The Redmine MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct RedmineMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

/// Build a tool result from an operation outcome.
///
/// `context` prefixes error messages, e.g. `"Error fetching issue"`.
fn into_tool_result<T: Serialize>(
    context: &str,
    result: crate::Result<T>,
) -> Result<CallToolResult, McpError> {
    match result {
        Ok(value) => Ok(CallToolResult::success(vec![Content::json(value)?])),
        Err(e) => {
            warn!(error = %e, "{context}");
            Ok(CallToolResult::error(vec![Content::text(format!(
                "{context}: {e}"
            ))]))
        }
    }
}

#[tool_router]
impl RedmineMcpServer {
    /// Fetch a Redmine issue.
    #[tool(
        name = "get-issue",
        description = "Fetch details about a Redmine issue by ID. Returns issue information including subject, description, status, priority, assignee, and change history (journals). Journals are paginated: use journalLimit and journalOffset to page through them."
    )]
    async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result("Error fetching issue", self.tools.get_issue(params).await)
    }

    /// Update a Redmine issue and optionally log time.
    #[tool(
        name = "update-issue",
        description = "Update a Redmine issue. Can update fields like status, assignee, add notes, and optionally log time spent. All parameters except issueId are optional. Invalid arguments, including a logHours value that is not positive, reject the whole call before anything is changed."
    )]
    async fn update_issue(
        &self,
        Parameters(params): Parameters<UpdateIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result("Error updating issue", self.tools.update_issue(params).await)
    }

    /// List issue statuses.
    #[tool(
        name = "list-issue-statuses",
        description = "List all available issue statuses in Redmine. Returns status IDs, names, and whether they represent a closed state. Use this to find valid status IDs when updating issues."
    )]
    async fn list_issue_statuses(&self) -> Result<CallToolResult, McpError> {
        into_tool_result(
            "Error fetching issue statuses",
            self.tools.list_issue_statuses().await,
        )
    }

    /// List project members.
    #[tool(
        name = "list-project-members",
        description = "List all members of a Redmine project. Returns users and groups with their roles. Use this to find user IDs for assigning issues."
    )]
    async fn list_project_members(
        &self,
        Parameters(params): Parameters<ListProjectMembersParams>,
    ) -> Result<CallToolResult, McpError> {
        into_tool_result(
            "Error listing project members",
            self.tools.list_project_members(params).await,
        )
    }

    /// Show the current user.
    #[tool(
        name = "whoami",
        description = "Get the current user's account information. Returns the user ID, login, name, email, and other account details. Use this to identify yourself when you need to assign issues to yourself or perform other user-specific actions."
    )]
    async fn whoami(&self) -> Result<CallToolResult, McpError> {
        into_tool_result("Error fetching current user", self.tools.whoami().await)
    }
}

impl RedmineMcpServer {
    /// Create a server backed by a Redmine HTTP client.
    #[must_use]
    pub fn new(client: RedmineClient) -> Self {
        Self::with_tracker(Arc::new(client))
    }

    /// Create a server backed by any tracker implementation.
    #[must_use]
    pub fn with_tracker(tracker: Arc<dyn IssueTracker>) -> Self {
        Self {
            tools: Arc::new(Tools::new(tracker)),
            tool_router: Self::tool_router(),
        }
    }

    /// Serve MCP over stdin/stdout until the client disconnects.
    ///
    /// # Errors
    ///
    /// Returns an error if the MCP handshake fails or the service task panics.
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(rmcp::transport::stdio()).await?;
        info!("Redmine MCP server ready on stdio");
        let reason = service.waiting().await?;
        info!(?reason, "Redmine MCP server stopped");
        Ok(())
    }
}

#[tool_handler]
impl ServerHandler for RedmineMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "redmine-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Redmine MCP server. Read and update issues, log time, and look up statuses, project members and the current user."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redmine::RedmineConfig;
    use rmcp::handler::server::ServerHandler;

    fn server() -> RedmineMcpServer {
        let config = RedmineConfig::new("https://redmine.example.com", "test-api-key").unwrap();
        RedmineMcpServer::new(RedmineClient::new(&config).unwrap())
    }

    #[test]
    fn test_server_info() {
        let info = server().get_info();
        assert_eq!(info.server_info.name, "redmine-mcp");
        assert!(!info.server_info.version.is_empty());
        assert!(info.instructions.is_some());
        assert!(info.capabilities.tools.is_some());
    }

    #[test]
    fn test_tool_router_has_all_tools() {
        let server = server();
        let tools = server.tool_router.list_all();

        let tool_names: Vec<&str> = tools.iter().map(|t| &*t.name).collect();

        assert!(tool_names.contains(&"get-issue"));
        assert!(tool_names.contains(&"update-issue"));
        assert!(tool_names.contains(&"list-issue-statuses"));
        assert!(tool_names.contains(&"list-project-members"));
        assert!(tool_names.contains(&"whoami"));
        assert_eq!(tools.len(), 5);
    }

    #[test]
    fn test_update_issue_schema_uses_camel_case() {
        let server = server();
        let tools = server.tool_router.list_all();
        let update = tools
            .iter()
            .find(|t| t.name == "update-issue")
            .expect("update-issue registered");

        let properties = update
            .input_schema
            .get("properties")
            .and_then(|p| p.as_object())
            .expect("schema has properties");
        assert!(properties.contains_key("issueId"));
        assert!(properties.contains_key("logHours"));
        assert!(properties.contains_key("privateNotes"));
    }

    #[test]
    fn test_update_issue_description_warns_about_rejected_hours() {
        let server = server();
        let tools = server.tool_router.list_all();
        let update = tools
            .iter()
            .find(|t| t.name == "update-issue")
            .expect("update-issue registered");

        let description = update.description.as_deref().unwrap_or_default();
        assert!(description.contains("logHours"));
        assert!(description.contains("before anything is changed"));
    }

    #[test]
    fn test_error_result_is_flagged() {
        let result = into_tool_result::<()>(
            "Error fetching issue",
            Err(redmine::Error::InvalidIssueId("abc".to_string()).into()),
        )
        .unwrap();

        assert_eq!(result.is_error, Some(true));
        let text = result.content[0].as_text().unwrap().text.clone();
        assert_eq!(text, "Error fetching issue: Invalid issue ID: abc");
    }
}
