//! Error types for the Redmine MCP server.

use thiserror::Error;

/// Errors that can occur in the Redmine MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid argument value provided.
    #[error("Invalid {field}: '{value}'. {expected}")]
    InvalidArgument {
        /// The argument name as the caller spelled it.
        field: &'static str,
        /// The invalid value that was provided.
        value: String,
        /// Description of valid values.
        expected: &'static str,
    },

    /// An error from the Redmine gateway or update workflow.
    #[error(transparent)]
    Redmine(#[from] redmine::Error),
}

impl Error {
    /// Whether the error was raised before any request reached Redmine.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        match self {
            Self::InvalidArgument { .. } => true,
            Self::Redmine(e) => e.kind() == redmine::ErrorKind::InvalidInput,
        }
    }
}

/// Result type for Redmine MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
