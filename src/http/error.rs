//! Classification of non-success responses from the backend.

use reqwest::{Response, StatusCode};

/// A non-success HTTP status, translated into something a user can act on.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401 that survived the refresh attempt
    #[error("Authentication required: {0}. Run `snote login` to sign in again.")]
    Unauthorized(String),
    /// HTTP 403
    #[error("Access forbidden: {0}")]
    Forbidden(String),
    /// HTTP 404
    #[error("Not found: {0}")]
    NotFound(String),
    /// Other 4xx, usually a validation failure with a JSON body
    #[error("Request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    /// 5xx
    #[error("Server error: HTTP {0}")]
    Server(u16),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Server(status) => *status,
        }
    }
}

/// Maps a non-success status and its body to an [`ApiError`].
pub fn classify_status(status: StatusCode, body: &str) -> ApiError {
    let detail = detail_message(body);
    match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(
            detail.unwrap_or_else(|| "Invalid or missing access token".to_string()),
        ),
        StatusCode::FORBIDDEN => ApiError::Forbidden(
            detail.unwrap_or_else(|| "Access to this resource is forbidden".to_string()),
        ),
        StatusCode::NOT_FOUND => ApiError::NotFound(
            detail.unwrap_or_else(|| "The requested resource was not found".to_string()),
        ),
        s if s.is_server_error() => ApiError::Server(s.as_u16()),
        s => ApiError::Rejected {
            status: s.as_u16(),
            body: body.trim().to_string(),
        },
    }
}

/// Passes successful responses through; reads the body of failures and
/// classifies them.
pub async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status, &body))
}

// DRF error bodies look like {"detail": "..."}
fn detail_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|d| d.as_str())
        .map(|s| s.to_string())
}
