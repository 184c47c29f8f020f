//! Issue update with optional time logging.
//!
//! The workflow runs strictly in order:
//!
//! 1. Parse the issue identifier. Failure ends the run before any request.
//! 2. Apply the field/notes update, which also refetches the issue.
//!    Failure ends the run.
//! 3. If hours were given, resolve an activity and create a time entry.
//!    Failure here is reported in [`IssueUpdateOutcome::time_entry_error`]
//!    and the run still succeeds.

use crate::client::IssueTracker;
use crate::domain::{Issue, IssueId, IssueUpdate, NewTimeEntry, TimeEntry};
use crate::error::{Error, Result};
use crate::journal::JournalPagination;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, warn};

/// Time to log alongside an issue update.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeLog {
    hours: f64,
    /// Activity to book against; resolved from the tracker when absent.
    pub activity_id: Option<u64>,
    /// Comment for the entry.
    pub comments: Option<String>,
    /// Day the time was spent.
    pub spent_on: Option<NaiveDate>,
}

impl TimeLog {
    /// Create a time log for `hours`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` unless `hours` is a finite positive number.
    pub fn new(hours: f64) -> Result<Self> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(Error::InvalidInput {
                field: "logHours",
                reason: format!("must be a positive number, got {hours}"),
            });
        }
        Ok(Self {
            hours,
            activity_id: None,
            comments: None,
            spent_on: None,
        })
    }

    /// Hours to log.
    #[must_use]
    pub fn hours(&self) -> f64 {
        self.hours
    }
}

/// Input to [`update_issue`].
#[derive(Debug, Clone, Default)]
pub struct IssueUpdateRequest {
    /// Raw identifier, `"12345"` or `"#12345"`.
    pub issue_id: String,
    /// Fields and notes to apply.
    pub update: IssueUpdate,
    /// Time to log after the update.
    pub time_log: Option<TimeLog>,
}

/// Result of [`update_issue`].
///
/// `time_entry_error` being present means the issue was updated but logging
/// time failed. Neither optional field is present when no time was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueUpdateOutcome {
    /// The issue after the update, journals windowed to the default size.
    pub issue: Issue,
    /// Window descriptor for `issue.journals`.
    #[serde(rename = "journalPagination")]
    pub journal_pagination: JournalPagination,
    /// The created time entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_entry: Option<TimeEntry>,
    /// Why the time entry could not be created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_entry_error: Option<String>,
}

/// Update an issue and optionally log time against it.
///
/// # Errors
///
/// Returns `Error::InvalidIssueId` without contacting the tracker if the
/// identifier does not parse, and propagates any failure of the update or
/// refetch. Time logging failures are not errors.
pub async fn update_issue(
    tracker: &dyn IssueTracker,
    request: IssueUpdateRequest,
) -> Result<IssueUpdateOutcome> {
    let id = IssueId::parse(&request.issue_id)?;

    debug!(issue_id = %id, "Applying issue update");
    let updated = tracker.update_issue(id, &request.update).await?;

    let mut outcome = IssueUpdateOutcome {
        issue: updated.issue,
        journal_pagination: updated.journal_pagination,
        time_entry: None,
        time_entry_error: None,
    };

    if let Some(time_log) = request.time_log {
        match log_time(tracker, id, time_log).await {
            Ok(entry) => outcome.time_entry = Some(entry),
            Err(e) => {
                warn!(issue_id = %id, error = %e, "Issue updated but time entry failed");
                outcome.time_entry_error = Some(e.to_string());
            }
        }
    }

    Ok(outcome)
}

async fn log_time(tracker: &dyn IssueTracker, id: IssueId, time_log: TimeLog) -> Result<TimeEntry> {
    let activity_id = match time_log.activity_id {
        Some(activity_id) => Some(activity_id),
        None => resolve_default_activity(tracker).await?,
    };
    debug!(issue_id = %id, ?activity_id, hours = time_log.hours, "Logging time");

    tracker
        .create_time_entry(&NewTimeEntry {
            issue_id: id,
            hours: time_log.hours,
            activity_id,
            spent_on: time_log.spent_on,
            comments: time_log.comments,
        })
        .await
}

/// The default-flagged activity, else the first one, else none.
async fn resolve_default_activity(tracker: &dyn IssueTracker) -> Result<Option<u64>> {
    let activities = tracker.list_time_entry_activities().await?;
    let chosen = activities
        .iter()
        .find(|activity| activity.is_default)
        .or_else(|| activities.first())
        .map(|activity| activity.id);
    if chosen.is_none() {
        debug!("No time entry activities defined; leaving activity to the tracker");
    }
    Ok(chosen)
}
