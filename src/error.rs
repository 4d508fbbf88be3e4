use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    error: String,
    status: u16,
}

/// Why a presented session token was not accepted.
///
/// These are the only three outcomes of a failed verification.  A token
/// signed with a different secret is reported as [`Invalid`](Self::Invalid)
/// like any other broken token, so callers cannot tell which check failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "lowercase")]
pub enum TokenError {
    #[error("No session token supplied")]
    Missing,

    #[error("Invalid session token")]
    Invalid,

    #[error("Session token has expired")]
    Expired,
}

impl TokenError {
    /// Wire name of the failure: `missing`, `invalid` or `expired`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Missing => "missing",
            TokenError::Invalid => "invalid",
            TokenError::Expired => "expired",
        }
    }
}

/// Errors from session configuration and the text codec helpers.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session auth not configured: {0}")]
    Config(String),

    #[error("Decode failed: {0}")]
    Decode(String),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status = StatusCode::UNAUTHORIZED;
        let body = ErrorBody {
            ok: false,
            error: self.as_str().to_owned(),
            status: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status = match &self {
            SessionError::Token(e) => return (*e).into_response(),
            SessionError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::Decode(_) => StatusCode::BAD_REQUEST,
        };

        let body = ErrorBody {
            ok: false,
            error: self.to_string(),
            status: status.as_u16(),
        };

        (status, axum::Json(body)).into_response()
    }
}
