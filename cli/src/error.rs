//! Error types and result aliases for bufete.
//!
//! This module provides the error handling system shared by the API layer and
//! the CLI:
//! - Specific error variants for each way a backend call can fail
//! - User-friendly error messages with recovery suggestions
//! - Helper methods for error classification
//! - Automatic conversion from common error types

use std::collections::BTreeMap;

use thiserror::Error;

/// Main error type for bufete operations.
///
/// Use [`requires_reauth`](Self::requires_reauth), [`is_retriable`](Self::is_retriable)
/// and [`is_cancelled`](Self::is_cancelled) to pick a handling strategy.
#[derive(Error, Debug)]
pub enum BufeteError {
    /// No session is stored locally.
    #[error("Not logged in. Run 'bufete auth login' to authenticate.")]
    NotAuthenticated,

    /// Backend rejected the session (401) and it could not be refreshed.
    #[error("The backend rejected your session (401). Run 'bufete auth login' to re-authenticate.")]
    Unauthorized,

    /// Login was rejected by the backend.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Backend refused the operation for the current user (403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource does not exist (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend rejected the submitted data (422).
    #[error("Validation failed: {message}")]
    Validation {
        /// Summary message from the backend.
        message: String,
        /// Per-field error messages.
        errors: BTreeMap<String, Vec<String>>,
    },

    /// API returned a non-success status code.
    #[error("API request failed ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// API server is unreachable (503 or connection failed).
    #[error("API server is unavailable. Check your network connection or try again later.")]
    ApiUnavailable,

    /// Request timed out.
    #[error("Request timed out. The server may be slow or unreachable. Try again later.")]
    Timeout,

    /// Network error during HTTP request.
    #[error("Network error: {0}. Check your internet connection.")]
    Network(String),

    /// The request was aborted by its caller.
    #[error("Request cancelled.")]
    Cancelled,

    /// Failed to access the OS keyring.
    #[error("Failed to access credential storage: {0}. Ensure your system keyring is unlocked.")]
    CredentialStorage(String),

    /// General configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}. Check file permissions and format.")]
    ConfigRead(String),

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON or TOML serialization/deserialization failed.
    #[error("Data serialization error: {0}. This may indicate an unexpected backend response.")]
    Serialization(String),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BufeteError {
    /// Checks if this error can be resolved by logging in again.
    #[must_use]
    pub const fn requires_reauth(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Unauthorized)
    }

    /// Checks if this error is transient and the operation might succeed on retry.
    #[must_use]
    pub const fn is_retriable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout | Self::ApiUnavailable)
    }

    /// Checks if the caller aborted the request.
    ///
    /// Cancelled requests are not failures and should not be reported to the user.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Maps a non-success response status and body to an error.
    #[must_use]
    pub fn from_status(status: u16, body: &str) -> Self {
        #[derive(serde::Deserialize, Default)]
        #[serde(default)]
        struct ErrorBody {
            message: Option<String>,
            error: Option<String>,
            errors: BTreeMap<String, Vec<String>>,
        }

        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
        let message = parsed
            .message
            .or(parsed.error)
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            422 => Self::Validation {
                message,
                errors: parsed.errors,
            },
            502..=504 => Self::ApiUnavailable,
            _ => Self::ApiError { status, message },
        }
    }
}

/// Result type alias using [`BufeteError`].
pub type Result<T> = std::result::Result<T, BufeteError>;

impl From<serde_json::Error> for BufeteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(format!("JSON error: {err}"))
    }
}

impl From<toml::de::Error> for BufeteError {
    fn from(err: toml::de::Error) -> Self {
        Self::ConfigRead(format!("TOML parse error: {err}"))
    }
}

impl From<keyring::Error> for BufeteError {
    fn from(err: keyring::Error) -> Self {
        Self::CredentialStorage(err.to_string())
    }
}

impl From<reqwest::Error> for BufeteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::ApiUnavailable
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for BufeteError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => e.into(),
            reqwest_middleware::Error::Middleware(e) => Self::Network(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_point_to_login() {
        assert!(BufeteError::NotAuthenticated
            .to_string()
            .contains("bufete auth login"));
        assert!(BufeteError::Unauthorized
            .to_string()
            .contains("bufete auth login"));
    }

    #[test]
    fn api_error_includes_status_and_message() {
        let err = BufeteError::ApiError {
            status: 409,
            message: "Slug already taken".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("409"));
        assert!(msg.contains("Slug already taken"));
    }

    #[test]
    fn requires_reauth_identifies_auth_errors() {
        assert!(BufeteError::NotAuthenticated.requires_reauth());
        assert!(BufeteError::Unauthorized.requires_reauth());

        assert!(!BufeteError::Timeout.requires_reauth());
        assert!(!BufeteError::Forbidden("no".to_string()).requires_reauth());
        assert!(!BufeteError::Cancelled.requires_reauth());
    }

    #[test]
    fn is_retriable_identifies_transient_errors() {
        assert!(BufeteError::Timeout.is_retriable());
        assert!(BufeteError::ApiUnavailable.is_retriable());
        assert!(BufeteError::Network("reset".to_string()).is_retriable());

        assert!(!BufeteError::Unauthorized.is_retriable());
        assert!(!BufeteError::Cancelled.is_retriable());
    }

    #[test]
    fn cancellation_is_distinguished() {
        assert!(BufeteError::Cancelled.is_cancelled());
        assert!(!BufeteError::Timeout.is_cancelled());
        assert!(!BufeteError::Network("x".to_string()).is_cancelled());
    }

    #[test]
    fn from_status_maps_validation_errors() {
        let body = r#"{"message":"The given data was invalid.","errors":{"email":["The email field is required."]}}"#;
        match BufeteError::from_status(422, body) {
            BufeteError::Validation { message, errors } => {
                assert_eq!(message, "The given data was invalid.");
                assert_eq!(errors["email"], vec!["The email field is required."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_status_maps_common_statuses() {
        assert!(matches!(
            BufeteError::from_status(401, "{}"),
            BufeteError::Unauthorized
        ));
        assert!(matches!(
            BufeteError::from_status(403, r#"{"message":"Admins only"}"#),
            BufeteError::Forbidden(m) if m == "Admins only"
        ));
        assert!(matches!(
            BufeteError::from_status(404, "missing"),
            BufeteError::NotFound(m) if m == "missing"
        ));
        assert!(matches!(
            BufeteError::from_status(503, ""),
            BufeteError::ApiUnavailable
        ));
        assert!(matches!(
            BufeteError::from_status(500, r#"{"error":"boom"}"#),
            BufeteError::ApiError { status: 500, message } if message == "boom"
        ));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: BufeteError = json_err.into();
        assert!(matches!(err, BufeteError::Serialization(_)));
    }

    #[test]
    fn from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BufeteError = io_err.into();
        assert!(matches!(err, BufeteError::Io(_)));
    }

    #[test]
    fn from_url_parse_error() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: BufeteError = url_err.into();
        assert!(matches!(err, BufeteError::InvalidUrl(_)));
    }
}
