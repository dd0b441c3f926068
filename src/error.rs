//! The error taxonomy shared by both data sources

use thiserror::Error;

use crate::task::TaskId;

/// An error raised by a task operation.
///
/// Transport failures (the server could not be reached at all, or the 10-second
/// request timeout elapsed) are kept distinct from server-side rejections, so callers
/// can tell a flaky connection from an actual 4xx/5xx answer.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never got an answer. Reported with status code 0,
    /// mirroring the wire convention.
    #[error("Network error. Please check your connection.")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error status. `message` is taken verbatim
    /// from the response envelope when present.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// A guest-mode operation referenced a task that is not in the store.
    /// This is a logical error with no HTTP status semantics.
    #[error("Task {0} not found")]
    NotFound(TaskId),

    /// The configured API base URL could not be parsed
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}

impl Error {
    /// The HTTP-derived status code: 0 for transport failures, the server's code
    /// for server rejections, and `None` for errors with no HTTP semantics.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Transport(_) => Some(0),
            Error::Server { status, .. } => Some(*status),
            Error::NotFound(_) => None,
            Error::InvalidBaseUrl(_) => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let server = Error::Server { status: 422, message: "Deadline is required".to_string() };
        assert_eq!(server.status(), Some(422));
        assert_eq!(server.to_string(), "Deadline is required");

        let not_found = Error::NotFound(TaskId::from("mock-1"));
        assert_eq!(not_found.status(), None);
        assert!(not_found.is_not_found());
        assert_eq!(not_found.to_string(), "Task mock-1 not found");
    }
}
