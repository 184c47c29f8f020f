//! MCP tool parameter models.
//!
//! Argument names are camelCase on the wire. Field doc comments become the
//! parameter descriptions in the published JSON schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `get-issue` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct GetIssueParams {
    /// Issue ID (e.g., '#12345' or '12345')
    pub issue_id: String,

    /// Include file attachments
    #[serde(default)]
    pub include_attachments: Option<bool>,

    /// Include watchers list
    #[serde(default)]
    pub include_watchers: Option<bool>,

    /// Include related issues
    #[serde(default)]
    pub include_relations: Option<bool>,

    /// Include child issues
    #[serde(default)]
    pub include_children: Option<bool>,

    /// Maximum number of journal entries to return (default 5)
    #[serde(default)]
    pub journal_limit: Option<usize>,

    /// Number of journal entries to skip, oldest first (default 0)
    #[serde(default)]
    pub journal_offset: Option<usize>,
}

/// Parameters for the `update-issue` tool.
///
/// Every field except `issue_id` is optional; only supplied fields are sent
/// to Redmine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIssueParams {
    /// Issue ID (e.g., '#12345' or '12345')
    pub issue_id: String,

    /// New issue subject/title
    #[serde(default)]
    pub subject: Option<String>,

    /// New issue description
    #[serde(default)]
    pub description: Option<String>,

    /// Status ID to set
    #[serde(default)]
    pub status_id: Option<u64>,

    /// Priority ID to set
    #[serde(default)]
    pub priority_id: Option<u64>,

    /// User ID to assign (use 0 to unassign)
    #[serde(default)]
    pub assigned_to_id: Option<u64>,

    /// Tracker ID to set
    #[serde(default)]
    pub tracker_id: Option<u64>,

    /// Parent issue ID
    #[serde(default)]
    pub parent_issue_id: Option<u64>,

    /// Start date (YYYY-MM-DD format)
    #[serde(default)]
    pub start_date: Option<String>,

    /// Due date (YYYY-MM-DD format)
    #[serde(default)]
    pub due_date: Option<String>,

    /// Percent done (0-100)
    #[serde(default)]
    pub done_ratio: Option<u32>,

    /// Estimated hours for the issue
    #[serde(default)]
    pub estimated_hours: Option<f64>,

    /// Comment/note to add to the issue journal
    #[serde(default)]
    pub notes: Option<String>,

    /// Make the notes private (default false)
    #[serde(default)]
    pub private_notes: Option<bool>,

    /// Hours to log as a time entry (must be positive)
    #[serde(default)]
    pub log_hours: Option<f64>,

    /// Activity ID for time entry (uses default activity if omitted)
    #[serde(default)]
    pub log_activity_id: Option<u64>,

    /// Comments for the time entry
    #[serde(default)]
    pub log_comments: Option<String>,

    /// Date for time entry (YYYY-MM-DD, defaults to today)
    #[serde(default)]
    pub log_spent_on: Option<String>,
}

/// Parameters for the `list-project-members` tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectMembersParams {
    /// Project ID or identifier (e.g., 'my-project' or '1')
    pub project_id: String,

    /// Maximum number of members to return (default 25)
    #[serde(default)]
    pub limit: Option<u32>,

    /// Number of members to skip for pagination
    #[serde(default)]
    pub offset: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_params_use_camel_case() {
        let params: UpdateIssueParams = serde_json::from_value(json!({
            "issueId": "#12345",
            "statusId": 2,
            "assignedToId": 0,
            "logHours": 1.5,
            "logSpentOn": "2024-01-20"
        }))
        .unwrap();

        assert_eq!(params.issue_id, "#12345");
        assert_eq!(params.status_id, Some(2));
        assert_eq!(params.assigned_to_id, Some(0));
        assert_eq!(params.log_hours, Some(1.5));
        assert_eq!(params.log_spent_on.as_deref(), Some("2024-01-20"));
        assert!(params.subject.is_none());
    }

    #[test]
    fn test_get_issue_params_optional_fields() {
        let params: GetIssueParams = serde_json::from_value(json!({"issueId": "1"})).unwrap();
        assert_eq!(params.journal_limit, None);
        assert_eq!(params.include_attachments, None);
    }

    #[test]
    fn test_schema_names_camel_case_properties() {
        let schema = serde_json::to_value(schemars::schema_for!(GetIssueParams)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(properties.contains_key("issueId"));
        assert!(properties.contains_key("journalLimit"));
        assert!(properties.contains_key("includeChildren"));
    }
}
