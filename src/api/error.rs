use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend refused a sign-in or sign-up attempt. Carries the
    /// service's message verbatim for classification.
    #[error("{0}")]
    CredentialsRejected(String),

    #[error("Unauthorized - session may be expired")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data around
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            format!(
                "{}... (truncated, {} total bytes)",
                &body[..MAX_ERROR_BODY_LENGTH],
                body.len()
            )
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

// ============================================================================
// Backend rejection classification
// ============================================================================

/// Known rejection reasons, matched against the backend's message content.
/// Anything unrecognized keeps the raw text for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    InvalidCredentials,
    UnconfirmedEmail,
    AlreadyRegistered,
    Other(String),
}

impl AuthFailure {
    pub fn classify(message: &str) -> Self {
        if message.contains("Invalid login credentials") {
            AuthFailure::InvalidCredentials
        } else if message.contains("Email not confirmed") {
            AuthFailure::UnconfirmedEmail
        } else if message.contains("User already registered") {
            AuthFailure::AlreadyRegistered
        } else {
            AuthFailure::Other(message.to_string())
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
