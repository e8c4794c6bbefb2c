use std::fmt;

use serde::{Deserialize, Serialize};

pub type RequestId = u64;

/// Body of `POST /api/clone`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CloneRequest {
    pub url: String,
}

/// Successful response from the cloning service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneResponse {
    pub html_content: String,
}

/// Error payload the service sends with non-2xx statuses.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CloneCompleted {
        request_id: RequestId,
        result: Result<String, CloneError>,
    },
    ServiceChecked {
        reachable: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneError {
    pub kind: FailureKind,
    pub message: String,
}

impl CloneError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for CloneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The request never produced a response (DNS, connect, timeout).
    Transport,
    /// Non-2xx status; `detail` is taken from the error body when present.
    Service { status: u16, detail: Option<String> },
    /// 2xx status with a body that is not a clone response.
    MalformedResponse,
    /// Body exceeded the configured limit.
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "transport error"),
            FailureKind::Service { status, .. } => write!(f, "service error (http {status})"),
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
        }
    }
}
