//! HTTP-level request failures.

use reqwest::StatusCode;

/// Broad category of an HTTP failure, derived from its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 401: missing, expired or rejected credential.
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// HTTP 400 or 422: the server rejected the submitted data.
    Validation,
    /// Any other 4xx (or unexpected non-success) status.
    Client,
    /// HTTP 5xx
    Server,
}

/// A response with a non-success status.
///
/// `Display` yields only the normalized message so it can be shown to users as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailed {
    pub status: StatusCode,
    pub message: String,
}

impl RequestFailed {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        classify_status(self.status)
    }
}

impl std::fmt::Display for RequestFailed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RequestFailed {}

pub fn classify_status(status: StatusCode) -> FailureKind {
    match status {
        StatusCode::UNAUTHORIZED => FailureKind::Unauthorized,
        StatusCode::FORBIDDEN => FailureKind::Forbidden,
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => FailureKind::Validation,
        s if s.is_server_error() => FailureKind::Server,
        _ => FailureKind::Client,
    }
}
