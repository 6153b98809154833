use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Session expired: {0}")]
    SessionExpired(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Session storage error: {0}")]
    Storage(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid carrying excessive data in errors
    fn truncate_body(body: &str) -> String {
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
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::Server {
                status: status.as_u16(),
                body: truncated,
            },
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// True when the caller's session is gone and a fresh login is required
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_) | ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        let status = |code: u16| reqwest::StatusCode::from_u16(code).unwrap();

        assert!(matches!(
            ApiError::from_status(status(401), ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(status(403), "nope"),
            ApiError::AccessDenied(_)
        ));
        assert!(matches!(
            ApiError::from_status(status(404), "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(status(500), "boom"),
            ApiError::Server { status: 500, .. }
        ));
        assert!(matches!(
            ApiError::from_status(status(503), ""),
            ApiError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ApiError::from_status(status(418), ""),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_body_truncation() {
        let long_body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, &long_body);
        match err {
            ApiError::Server { status, body } => {
                assert_eq!(status, 502);
                assert!(body.len() < 600);
                assert!(body.contains("truncated"));
            }
            other => panic!("Expected Server error, got: {:?}", other),
        }
    }

    #[test]
    fn test_requires_login() {
        assert!(ApiError::Unauthorized.requires_login());
        assert!(ApiError::SessionExpired("refresh rejected".into()).requires_login());
        assert!(!ApiError::NotFound("x".into()).requires_login());
    }
}
