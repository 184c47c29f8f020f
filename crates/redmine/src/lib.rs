//! Redmine REST client.
//!
//! This crate provides a typed gateway over the Redmine REST API together
//! with the issue-level workflows built on top of it:
//!
//! - [`client`]: the [`IssueTracker`] trait and its HTTP implementation
//! - [`journal`]: windowing of an issue's journal history
//! - [`issue_update`]: field update followed by optional time logging
//!
//! # Example
//!
//! ```no_run
//! use redmine::{IssueIncludes, IssueId, IssueTracker, RedmineClient, RedmineConfig};
//! use redmine::journal::{JournalWindow, PaginatedIssue};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> redmine::Result<()> {
//!     let config = RedmineConfig::new("https://redmine.example.com", "api-key")?;
//!     let client = RedmineClient::new(&config)?;
//!
//!     let issue = client
//!         .fetch_issue(IssueId::parse("#12345")?, IssueIncludes::default())
//!         .await?;
//!     let page = PaginatedIssue::new(issue, JournalWindow::default());
//!     println!("{} journals", page.journal_pagination.total_count);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod issue_update;
pub mod journal;

pub use client::{IssueTracker, RedmineClient};
pub use config::RedmineConfig;
pub use domain::{IssueId, IssueIncludes, IssueUpdate};
pub use error::{Error, ErrorKind, Result};
