//! Error types for Redmine operations.

use thiserror::Error;

/// Coarse classification of an [`Error`].
///
/// Callers that translate errors into their own envelopes branch on this
/// instead of matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input was rejected locally; no request was sent.
    InvalidInput,
    /// The tracker reported a missing resource.
    NotFound,
    /// The tracker answered with a non-success status or an unreadable body.
    Upstream,
    /// The request did not produce a response.
    Transport,
    /// The client configuration is unusable.
    Config,
}

/// The error type for Redmine operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The issue identifier could not be parsed.
    #[error("Invalid issue ID: {0}")]
    InvalidIssueId(String),

    /// An argument was rejected before contacting the tracker.
    #[error("Invalid {field}: {reason}")]
    InvalidInput {
        /// The argument that was rejected.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// The tracker answered 404.
    #[error("Failed to {action}: {status} {status_text}")]
    NotFound {
        /// What the client was doing.
        action: String,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The tracker answered with any other non-success status.
    #[error("Failed to {action}: {status} {status_text}")]
    Upstream {
        /// What the client was doing.
        action: String,
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The tracker answered successfully but the body could not be decoded.
    #[error("Failed to {action}: unexpected response body: {source}")]
    Decode {
        /// What the client was doing.
        action: String,
        /// The underlying decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The request failed before any response was received.
    #[error("Failed to {action}: {source}")]
    Transport {
        /// What the client was doing.
        action: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIssueId(_) | Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Upstream { .. } | Self::Decode { .. } => ErrorKind::Upstream,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status reported by the tracker, if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound { status, .. } | Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A specialized Result type for Redmine operations.
pub type Result<T> = std::result::Result<T, Error>;
