//! Redmine data model.
//!
//! These types mirror the JSON the Redmine REST API returns. Issue and user
//! payloads keep fields this crate does not model in a flattened `extra` map
//! so callers see everything the tracker sent.

use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Numeric Redmine issue identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(u64);

impl IssueId {
    /// Wrap a numeric identifier.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Parse `"12345"` or `"#12345"`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIssueId` carrying the raw input if the remainder
    /// is not an unsigned integer.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .map(Self)
            .map_err(|_| Error::InvalidIssueId(raw.to_string()))
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An `{id, name}` reference to another Redmine object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    /// Object ID.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// Value of a custom field: Redmine sends a string, or an array for
/// multi-select fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    /// Single value.
    Single(String),
    /// Multi-select values.
    Multiple(Vec<String>),
}

/// A custom field on an issue or user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    /// Field ID.
    pub id: u64,
    /// Field name.
    pub name: String,
    /// Current value, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<CustomFieldValue>,
}

/// A structured change recorded in a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalDetail {
    /// Kind of property changed (`attr`, `cf`, `attachment`, `relation`).
    pub property: String,
    /// Name of the changed field.
    pub name: String,
    /// Previous value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// New value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

/// An entry in an issue's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    /// Journal ID.
    pub id: u64,
    /// Author of the entry.
    pub user: NamedRef,
    /// Free-text note; empty for pure field changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Whether the note is private.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<bool>,
    /// Field changes recorded by this entry.
    #[serde(default)]
    pub details: Vec<JournalDetail>,
}

/// A file attached to an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Attachment ID.
    pub id: u64,
    /// File name.
    pub filename: String,
    /// Size in bytes.
    pub filesize: u64,
    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    /// Uploader.
    pub author: NamedRef,
    /// Upload timestamp.
    pub created_on: DateTime<Utc>,
}

/// A relation between two issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation ID.
    pub id: u64,
    /// Source issue.
    pub issue_id: u64,
    /// Target issue.
    pub issue_to_id: u64,
    /// Relation type (`relates`, `blocks`, `precedes`, ...).
    pub relation_type: String,
    /// Delay in days for `precedes`/`follows`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<i64>,
}

/// Summary of a child issue as embedded in its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildIssue {
    /// Child issue ID.
    pub id: u64,
    /// Tracker of the child.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracker: Option<NamedRef>,
    /// Child subject.
    pub subject: String,
    /// Grandchildren, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ChildIssue>>,
}

/// A Redmine issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue ID.
    pub id: u64,
    /// Owning project.
    pub project: NamedRef,
    /// Tracker (bug, feature, ...).
    pub tracker: NamedRef,
    /// Current status.
    pub status: NamedRef,
    /// Priority.
    pub priority: NamedRef,
    /// Author.
    pub author: NamedRef,
    /// Assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
    /// Parent issue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<IssueRef>,
    /// Subject line.
    pub subject: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// Due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Percent done.
    #[serde(default)]
    pub done_ratio: u8,
    /// Estimated hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_on: DateTime<Utc>,
    /// Custom field values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<Vec<CustomField>>,
    /// History entries, oldest first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journals: Option<Vec<Journal>>,
    /// Attachments, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// Watchers, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub watchers: Option<Vec<NamedRef>>,
    /// Relations, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<Relation>>,
    /// Child issues, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ChildIssue>>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A bare `{id}` issue reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRef {
    /// Issue ID.
    pub id: u64,
}

/// Optional collections to embed when fetching an issue.
///
/// Journals are always requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct IssueIncludes {
    /// Embed attachments.
    pub attachments: bool,
    /// Embed watchers.
    pub watchers: bool,
    /// Embed relations.
    pub relations: bool,
    /// Embed child issues.
    pub children: bool,
}

impl IssueIncludes {
    /// Comma-separated `include` query value, always starting with `journals`.
    #[must_use]
    pub fn to_query(self) -> String {
        let mut includes = vec!["journals"];
        if self.attachments {
            includes.push("attachments");
        }
        if self.watchers {
            includes.push("watchers");
        }
        if self.relations {
            includes.push("relations");
        }
        if self.children {
            includes.push("children");
        }
        includes.join(",")
    }
}

/// Sparse issue update.
///
/// Only fields that are `Some` are sent; Redmine treats an omitted field as
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueUpdate {
    /// New subject.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_id: Option<u64>,
    /// New priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_id: Option<u64>,
    /// New assignee; `0` unassigns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<u64>,
    /// New tracker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker_id: Option<u64>,
    /// New parent issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_issue_id: Option<u64>,
    /// New start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    /// New due date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// New percent done (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<u8>,
    /// New estimate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,
    /// Note appended to the journal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Whether the note is private.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_notes: Option<bool>,
}

/// Payload for creating a time entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTimeEntry {
    /// Issue the time is logged against.
    pub issue_id: IssueId,
    /// Hours spent.
    pub hours: f64,
    /// Activity; the tracker applies its own default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<u64>,
    /// Day the time was spent; the tracker uses today when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_on: Option<NaiveDate>,
    /// Comment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

/// A logged time entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Entry ID.
    pub id: u64,
    /// Project the time was booked on.
    pub project: NamedRef,
    /// Issue the time was booked on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<IssueRef>,
    /// User who logged the time.
    pub user: NamedRef,
    /// Activity.
    pub activity: NamedRef,
    /// Hours spent.
    pub hours: f64,
    /// Comment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Day the time was spent.
    pub spent_on: NaiveDate,
    /// Creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_on: DateTime<Utc>,
}

/// A time entry activity enumeration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Activity ID.
    pub id: u64,
    /// Activity name.
    pub name: String,
    /// Whether Redmine marks this activity as the default.
    #[serde(default)]
    pub is_default: bool,
}

/// An issue status definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStatus {
    /// Status ID.
    pub id: u64,
    /// Status name.
    pub name: String,
    /// Whether issues in this status count as closed.
    #[serde(default)]
    pub is_closed: bool,
}

/// A role held through a membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRole {
    /// Role ID.
    pub id: u64,
    /// Role name.
    pub name: String,
    /// Whether the role is inherited from a group or parent project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherited: Option<bool>,
}

/// A user or group assignment to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Membership ID.
    pub id: u64,
    /// Project.
    pub project: NamedRef,
    /// Member user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    /// Member group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<NamedRef>,
    /// Roles held.
    #[serde(default)]
    pub roles: Vec<MembershipRole>,
}

/// Paging parameters for membership listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MembershipQuery {
    /// Page size; the tracker default applies when absent.
    pub limit: Option<u32>,
    /// Number of entries to skip.
    pub offset: Option<u32>,
}

/// One page of project memberships, as returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPage {
    /// Memberships in this page.
    pub memberships: Vec<Membership>,
    /// Total number of memberships.
    pub total_count: u64,
    /// Offset of this page.
    pub offset: u64,
    /// Page size.
    pub limit: u64,
}

/// Profile of the authenticated user.
///
/// Produced by the gateway with the API key removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: u64,
    /// Login name.
    pub login: String,
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Email address, if visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Account creation timestamp.
    pub created_on: DateTime<Utc>,
    /// Last profile update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<DateTime<Utc>>,
    /// Last login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_on: Option<DateTime<Utc>>,
    /// Last password change.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passwd_changed_on: Option<DateTime<Utc>>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Account status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u8>,
    /// Custom field values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CurrentUser {
    /// Remove the `api_key` field, then every value equal to that key or to
    /// one of `secrets`, at any depth.
    #[must_use]
    pub fn without_secrets(mut self, secrets: &[&str]) -> Self {
        let upstream_key = self.extra.remove("api_key");
        let mut secrets: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
        if let Some(key) = upstream_key
            .as_ref()
            .and_then(Value::as_str)
            .filter(|key| !key.is_empty())
        {
            secrets.push(key);
        }

        scrub_map(&mut self.extra, &secrets);
        for field in &mut self.custom_fields {
            let leaks = matches!(
                &field.value,
                Some(CustomFieldValue::Single(value)) if secrets.contains(&value.as_str())
            );
            if leaks {
                field.value = None;
            } else if let Some(CustomFieldValue::Multiple(values)) = &mut field.value {
                values.retain(|value| !secrets.contains(&value.as_str()));
            }
        }
        self
    }
}

fn is_secret(value: &Value, secrets: &[&str]) -> bool {
    value.as_str().is_some_and(|s| secrets.contains(&s))
}

fn scrub_map(map: &mut Map<String, Value>, secrets: &[&str]) {
    map.retain(|_, value| !is_secret(value, secrets));
    for value in map.values_mut() {
        scrub(value, secrets);
    }
}

fn scrub(value: &mut Value, secrets: &[&str]) {
    match value {
        Value::Object(map) => scrub_map(map, secrets),
        Value::Array(items) => {
            items.retain(|item| !is_secret(item, secrets));
            for item in items {
                scrub(item, secrets);
            }
        }
        _ => {}
    }
}
