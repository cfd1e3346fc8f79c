//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2004,
///     "message": "activity is full: Chess Club",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category          | HTTP Status                |
/// |-----------|-------------------|----------------------------|
/// | 1000–1999 | Validation        | 400 Bad Request            |
/// | 2000–2999 | State / Not Found | 404 Not Found / 400        |
/// | 3000–3999 | Server            | 500 / 503                  |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No activity with the given name exists.
    #[error("activity not found: {0}")]
    ActivityNotFound(String),

    /// An activity with the given name already exists.
    #[error("activity already exists: {0}")]
    ActivityExists(String),

    /// The student is already signed up for the activity.
    #[error("{email} is already signed up for {activity}")]
    AlreadySignedUp {
        /// Activity name.
        activity: String,
        /// Student email.
        email: String,
    },

    /// The activity roster is at capacity.
    #[error("activity is full: {0}")]
    ActivityFull(String),

    /// The student is not signed up for the activity.
    #[error("{email} is not signed up for {activity}")]
    NotSignedUp {
        /// Activity name.
        activity: String,
        /// Student email.
        email: String,
    },

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The persistent store stayed unavailable after bounded retries.
    #[error("store unavailable: {0}")]
    TransientStore(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::ActivityNotFound(_) => 2001,
            Self::ActivityExists(_) => 2002,
            Self::AlreadySignedUp { .. } => 2003,
            Self::ActivityFull(_) => 2004,
            Self::NotSignedUp { .. } => 2005,
            Self::Internal(_) => 3000,
            Self::TransientStore(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ActivityNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidRequest(_)
            | Self::ActivityExists(_)
            | Self::AlreadySignedUp { .. }
            | Self::ActivityFull(_)
            | Self::NotSignedUp { .. } => StatusCode::BAD_REQUEST,
            Self::TransientStore(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_404() {
        let err = GatewayError::ActivityNotFound("Chess Club".to_string());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), 2001);
    }

    #[test]
    fn roster_violations_map_to_400() {
        let full = GatewayError::ActivityFull("Chess Club".to_string());
        assert_eq!(full.status_code(), StatusCode::BAD_REQUEST);

        let dup = GatewayError::AlreadySignedUp {
            activity: "Chess Club".to_string(),
            email: "a@x.edu".to_string(),
        };
        assert_eq!(dup.status_code(), StatusCode::BAD_REQUEST);

        let missing = GatewayError::NotSignedUp {
            activity: "Chess Club".to_string(),
            email: "a@x.edu".to_string(),
        };
        assert_eq!(missing.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn transient_store_maps_to_503() {
        let err = GatewayError::TransientStore("connection refused".to_string());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 3002);
    }

    #[test]
    fn display_includes_identifiers() {
        let err = GatewayError::AlreadySignedUp {
            activity: "Chess Club".to_string(),
            email: "a@x.edu".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("a@x.edu"));
        assert!(msg.contains("Chess Club"));
    }
}
