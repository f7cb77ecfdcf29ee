//! Data source error types

use std::time::Duration;

/// Errors a [`DataSource`](crate::source::DataSource) reports for a failed fetch.
///
/// The table catches these once per request and surfaces them as its error
/// state. Nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The backing store could not be reached.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request did not complete in time.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The backing store answered, but refused the query.
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// Status code reported by the backend.
        status: u16,
        /// Error message.
        message: String,
    },

    /// Filters or response payload could not be (de)serialized.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a new rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Returns the backend status code if this is a rejection.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
