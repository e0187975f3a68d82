use std::fmt::{Display, Formatter};

use serde::Serialize;
use thiserror::Error;

/// Outcome of a failed create/update/remove, returned to the screen.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// The server rejected the credential; the session store has been told.
    #[error("Session expired")]
    SessionExpired,

    /// The server refused the write; carries its message verbatim.
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected response: {0}")]
    Malformed(String),

    /// The owning screen has been unmounted.
    #[error("Screen is no longer active")]
    Abandoned,
}

pub type ControllerResult<T> = Result<T, ControllerError>;

pub(crate) const NETWORK_FAILURE_MESSAGE: &str =
    "Could not load data from the server. Check your connection and try again.";

pub(crate) const MALFORMED_RESPONSE_MESSAGE: &str =
    "The server returned an unexpected response. Try again later.";

pub(crate) const DEFAULT_REJECTION_MESSAGE: &str = "The request was rejected by the server.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Network,
    Malformed,
}

/// Read-path failure kept on the controller for inline display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorInfo {
    pub fn network() -> Self {
        Self {
            kind: ErrorKind::Network,
            message: NETWORK_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn malformed() -> Self {
        Self {
            kind: ErrorKind::Malformed,
            message: MALFORMED_RESPONSE_MESSAGE.to_string(),
        }
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
