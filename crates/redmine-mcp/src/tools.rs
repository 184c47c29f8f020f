//! MCP tool implementations.
//!
//! Each method validates its arguments, then delegates to the Redmine gateway
//! or the issue update workflow. Argument errors are returned before any
//! request is sent.

use crate::error::{Error, Result};
use crate::models::{GetIssueParams, ListProjectMembersParams, UpdateIssueParams};
use chrono::NaiveDate;
use redmine::domain::{CurrentUser, IssueStatus, MembershipPage, MembershipQuery};
use redmine::issue_update::{IssueUpdateOutcome, IssueUpdateRequest, TimeLog, update_issue};
use redmine::journal::{JournalWindow, PaginatedIssue};
use redmine::{IssueId, IssueIncludes, IssueTracker, IssueUpdate};
use std::sync::Arc;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Tool implementations for the Redmine MCP server.
pub struct Tools {
    tracker: Arc<dyn IssueTracker>,
}

impl Tools {
    /// Create a new Tools instance backed by the given tracker.
    pub fn new(tracker: Arc<dyn IssueTracker>) -> Self {
        Self { tracker }
    }

    /// Fetch an issue with one window of its journals.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID or journal window is invalid, or the fetch fails.
    pub async fn get_issue(&self, params: GetIssueParams) -> Result<PaginatedIssue> {
        let id = IssueId::parse(&params.issue_id)?;
        let window = JournalWindow::new(params.journal_limit, params.journal_offset)?;
        let includes = IssueIncludes {
            attachments: params.include_attachments.unwrap_or(false),
            watchers: params.include_watchers.unwrap_or(false),
            relations: params.include_relations.unwrap_or(false),
            children: params.include_children.unwrap_or(false),
        };
        debug!(issue_id = %id, ?includes, ?window, "get-issue");

        let issue = self.tracker.fetch_issue(id, includes).await?;
        Ok(PaginatedIssue::new(issue, window))
    }

    /// Update an issue and optionally log time against it.
    ///
    /// A failed time entry is reported inside the returned outcome, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns an error if an argument is invalid or the issue update fails.
    pub async fn update_issue(&self, params: UpdateIssueParams) -> Result<IssueUpdateOutcome> {
        let request = build_update_request(params)?;
        debug!(
            issue_id = %request.issue_id,
            logs_time = request.time_log.is_some(),
            "update-issue"
        );

        Ok(update_issue(self.tracker.as_ref(), request).await?)
    }

    /// List all issue statuses.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>> {
        Ok(self.tracker.list_issue_statuses().await?)
    }

    /// List one page of a project's members.
    ///
    /// # Errors
    ///
    /// Returns an error if the project ID is blank or the request fails.
    pub async fn list_project_members(
        &self,
        params: ListProjectMembersParams,
    ) -> Result<MembershipPage> {
        let project_id = params.project_id.trim();
        if project_id.is_empty() {
            return Err(Error::InvalidArgument {
                field: "projectId",
                value: params.project_id.clone(),
                expected: "Must be a project ID or identifier.",
            });
        }

        let query = MembershipQuery {
            limit: params.limit,
            offset: params.offset,
        };
        Ok(self.tracker.list_project_members(project_id, query).await?)
    }

    /// Get the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn whoami(&self) -> Result<CurrentUser> {
        Ok(self.tracker.current_user().await?)
    }
}

/// Turn `update-issue` arguments into a workflow request.
///
/// The issue ID is passed through raw; the workflow parses it.
fn build_update_request(params: UpdateIssueParams) -> Result<IssueUpdateRequest> {
    let done_ratio = params
        .done_ratio
        .map(|ratio| {
            u8::try_from(ratio)
                .ok()
                .filter(|r| *r <= 100)
                .ok_or_else(|| Error::InvalidArgument {
                    field: "doneRatio",
                    value: ratio.to_string(),
                    expected: "Must be between 0 and 100.",
                })
        })
        .transpose()?;

    let update = IssueUpdate {
        subject: params.subject,
        description: params.description,
        status_id: params.status_id,
        priority_id: params.priority_id,
        assigned_to_id: params.assigned_to_id,
        tracker_id: params.tracker_id,
        parent_issue_id: params.parent_issue_id,
        start_date: parse_date("startDate", params.start_date.as_deref())?,
        due_date: parse_date("dueDate", params.due_date.as_deref())?,
        done_ratio,
        estimated_hours: params.estimated_hours,
        notes: params.notes,
        private_notes: params.private_notes,
    };

    let spent_on = parse_date("logSpentOn", params.log_spent_on.as_deref())?;
    let time_log = match params.log_hours {
        Some(hours) => {
            let mut log = TimeLog::new(hours)?;
            log.activity_id = params.log_activity_id;
            log.comments = params.log_comments;
            log.spent_on = spent_on;
            Some(log)
        }
        None => None,
    };

    Ok(IssueUpdateRequest {
        issue_id: params.issue_id,
        update,
        time_log,
    })
}

/// Parse an optional `YYYY-MM-DD` argument.
fn parse_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    // chrono tolerates padding spaces inside numeric fields.
    let well_formed = value.len() == 10
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(invalid_date(field, value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(Some)
        .map_err(|_| invalid_date(field, value))
}

fn invalid_date(field: &'static str, value: &str) -> Error {
    Error::InvalidArgument {
        field,
        value: value.to_string(),
        expected: "Must be YYYY-MM-DD format.",
    }
}
