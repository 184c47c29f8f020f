//! Redmine REST gateway.
//!
//! [`IssueTracker`] is the seam the rest of the system talks to;
//! [`RedmineClient`] implements it over HTTP. Every request carries the
//! `X-Redmine-API-Key` and `Accept: application/json` headers. Non-success
//! responses become [`Error::NotFound`] or [`Error::Upstream`] with the status
//! code and reason phrase; requests that never get a response become
//! [`Error::Transport`].

use crate::config::RedmineConfig;
use crate::domain::{
    Activity, CurrentUser, Issue, IssueId, IssueIncludes, IssueStatus, IssueUpdate,
    MembershipPage, MembershipQuery, NewTimeEntry, TimeEntry,
};
use crate::error::{Error, Result};
use crate::journal::{JournalWindow, PaginatedIssue};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Header carrying the Redmine API key.
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// Operations against a remote issue tracker.
///
/// Implementations must be `Send + Sync`; concurrent tool invocations share
/// one instance and hold no state between calls.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch an issue with its full journal list and the requested extra
    /// collections.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing issue, `Upstream` for other failure statuses,
    /// `Transport` when no response arrives.
    async fn fetch_issue(&self, id: IssueId, includes: IssueIncludes) -> Result<Issue>;

    /// Apply a sparse update, then refetch the issue with the default journal
    /// window.
    ///
    /// A failed update returns before the refetch is attempted.
    ///
    /// # Errors
    ///
    /// Propagates failures of either request.
    async fn update_issue(&self, id: IssueId, update: &IssueUpdate) -> Result<PaginatedIssue>;

    /// Log time against an issue.
    ///
    /// # Errors
    ///
    /// Propagates request failures; the tracker validates the entry.
    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry>;

    /// List time entry activities in tracker order.
    ///
    /// # Errors
    ///
    /// Propagates request failures.
    async fn list_time_entry_activities(&self) -> Result<Vec<Activity>>;

    /// List issue statuses in tracker order.
    ///
    /// # Errors
    ///
    /// Propagates request failures.
    async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>>;

    /// List one page of a project's memberships.
    ///
    /// # Errors
    ///
    /// Propagates request failures.
    async fn list_project_members(
        &self,
        project_id: &str,
        query: MembershipQuery,
    ) -> Result<MembershipPage>;

    /// Fetch the authenticated user's profile with the API key removed.
    ///
    /// # Errors
    ///
    /// Propagates request failures.
    async fn current_user(&self) -> Result<CurrentUser>;
}

#[derive(serde::Deserialize)]
struct IssueEnvelope {
    issue: Issue,
}

#[derive(serde::Deserialize)]
struct TimeEntryEnvelope {
    time_entry: TimeEntry,
}

#[derive(serde::Deserialize)]
struct ActivitiesEnvelope {
    time_entry_activities: Vec<Activity>,
}

#[derive(serde::Deserialize)]
struct IssueStatusesEnvelope {
    issue_statuses: Vec<IssueStatus>,
}

#[derive(serde::Deserialize)]
struct CurrentUserEnvelope {
    user: CurrentUser,
}

#[derive(Serialize)]
struct IssueUpdateEnvelope<'a> {
    issue: &'a IssueUpdate,
}

#[derive(Serialize)]
struct NewTimeEntryEnvelope<'a> {
    time_entry: &'a NewTimeEntry,
}

/// HTTP implementation of [`IssueTracker`].
#[derive(Clone)]
pub struct RedmineClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl RedmineClient {
    /// Create a client for the configured instance.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the URL or API key cannot be used in a
    /// request, or the HTTP client cannot be built.
    pub fn new(config: &RedmineConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let mut api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|_| Error::Config("API key is not a valid header value".to_string()))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("redmine-rs/", env!("CARGO_PKG_VERSION"))),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {e}")))?;

        debug!(url = %base_url, "Created Redmine client");
        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Base URL requests are built from.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Config(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, action: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|source| {
            warn!(action, error = %source, "Redmine request failed");
            Error::Transport {
                action: action.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(action, status = status.as_u16(), "Redmine request succeeded");
            return Ok(response);
        }

        warn!(action, status = status.as_u16(), "Redmine returned an error status");
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let action = action.to_string();
        if status == StatusCode::NOT_FOUND {
            Err(Error::NotFound {
                action,
                status: status.as_u16(),
                status_text,
            })
        } else {
            Err(Error::Upstream {
                action,
                status: status.as_u16(),
                status_text,
            })
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        action: &str,
        request: RequestBuilder,
    ) -> Result<T> {
        let response = self.send(action, request).await?;
        response.json::<T>().await.map_err(|source| Error::Decode {
            action: action.to_string(),
            source,
        })
    }
}

#[async_trait]
impl IssueTracker for RedmineClient {
    async fn fetch_issue(&self, id: IssueId, includes: IssueIncludes) -> Result<Issue> {
        let mut url = self.endpoint(&["issues", &format!("{id}.json")])?;
        url.set_query(Some(&format!("include={}", includes.to_query())));
        debug!(issue_id = %id, %url, "Fetching issue");

        let envelope: IssueEnvelope = self
            .send_json(&format!("fetch issue {id}"), self.http.get(url))
            .await?;
        Ok(envelope.issue)
    }

    async fn update_issue(&self, id: IssueId, update: &IssueUpdate) -> Result<PaginatedIssue> {
        let url = self.endpoint(&["issues", &format!("{id}.json")])?;
        debug!(issue_id = %id, "Updating issue");

        // Redmine answers a successful PUT with an empty body.
        self.send(
            &format!("update issue {id}"),
            self.http
                .put(url)
                .json(&IssueUpdateEnvelope { issue: update }),
        )
        .await?;

        let issue = self.fetch_issue(id, IssueIncludes::default()).await?;
        Ok(PaginatedIssue::new(issue, JournalWindow::default()))
    }

    async fn create_time_entry(&self, entry: &NewTimeEntry) -> Result<TimeEntry> {
        let url = self.endpoint(&["time_entries.json"])?;
        debug!(issue_id = %entry.issue_id, hours = entry.hours, "Creating time entry");

        let envelope: TimeEntryEnvelope = self
            .send_json(
                "create time entry",
                self.http
                    .post(url)
                    .json(&NewTimeEntryEnvelope { time_entry: entry }),
            )
            .await?;
        Ok(envelope.time_entry)
    }

    async fn list_time_entry_activities(&self) -> Result<Vec<Activity>> {
        let url = self.endpoint(&["enumerations", "time_entry_activities.json"])?;
        let envelope: ActivitiesEnvelope = self
            .send_json("fetch time entry activities", self.http.get(url))
            .await?;
        Ok(envelope.time_entry_activities)
    }

    async fn list_issue_statuses(&self) -> Result<Vec<IssueStatus>> {
        let url = self.endpoint(&["issue_statuses.json"])?;
        let envelope: IssueStatusesEnvelope = self
            .send_json("fetch issue statuses", self.http.get(url))
            .await?;
        Ok(envelope.issue_statuses)
    }

    async fn list_project_members(
        &self,
        project_id: &str,
        query: MembershipQuery,
    ) -> Result<MembershipPage> {
        let url = self.endpoint(&["projects", project_id, "memberships.json"])?;
        let mut request = self.http.get(url);
        if let Some(limit) = query.limit {
            request = request.query(&[("limit", limit)]);
        }
        if let Some(offset) = query.offset {
            request = request.query(&[("offset", offset)]);
        }

        self.send_json("fetch project members", request).await
    }

    async fn current_user(&self) -> Result<CurrentUser> {
        let url = self.endpoint(&["users", "current.json"])?;
        let envelope: CurrentUserEnvelope = self
            .send_json("fetch current user", self.http.get(url))
            .await?;
        Ok(envelope.user.without_secrets(&[self.api_key.as_str()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> RedmineClient {
        RedmineClient::new(&RedmineConfig::new(url, "test-api-key").unwrap()).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let client = client("https://redmine.example.com");
        let url = client.endpoint(&["issues", "12345.json"]).unwrap();
        assert_eq!(url.as_str(), "https://redmine.example.com/issues/12345.json");
    }

    #[test]
    fn test_endpoint_keeps_sub_path() {
        let client = client("https://example.com/redmine/");
        let url = client
            .endpoint(&["enumerations", "time_entry_activities.json"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/redmine/enumerations/time_entry_activities.json"
        );
    }

    #[test]
    fn test_endpoint_encodes_project_identifier() {
        let client = client("https://redmine.example.com");
        let url = client
            .endpoint(&["projects", "a b/c", "memberships.json"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://redmine.example.com/projects/a%20b%2Fc/memberships.json"
        );
    }

    #[test]
    fn test_new_rejects_unusable_key() {
        let config = RedmineConfig::new("https://redmine.example.com", "bad\nkey").unwrap();
        assert!(matches!(RedmineClient::new(&config), Err(Error::Config(_))));
    }
}
