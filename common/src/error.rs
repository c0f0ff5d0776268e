//! Typed failures shared by the clients and the web front end.
//!
//! Payloads are plain strings so the errors can cross the server-function
//! boundary as serialized values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A failed call to the inference API.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum InferenceError {
    #[error("cannot reach inference API: {0}")]
    Transport(String),

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("unexpected response from inference API: {0}")]
    Decode(String),

    #[error("invalid request: {0}")]
    Request(String),
}

impl InferenceError {
    /// Short text for the result panel.
    pub fn user_message(&self) -> String {
        match self {
            InferenceError::Transport(_) => {
                "The analysis service is unreachable. Please try again later.".into()
            }
            InferenceError::Status { status, .. } => {
                format!("The analysis service rejected the request (HTTP {status}).")
            }
            InferenceError::Decode(_) => {
                "The analysis service returned a response we could not read.".into()
            }
            InferenceError::Request(msg) => msg.clone(),
        }
    }
}

/// A failed sign-in, sign-up or sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    EmailExists,

    #[error("password is too weak: {0}")]
    WeakPassword(String),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("too many attempts, try again later")]
    TooManyAttempts,

    #[error("identity provider error: {0}")]
    Provider(String),
}

impl AuthError {
    /// Map an Identity Toolkit error code (`error.message`) to a variant.
    ///
    /// Codes may carry a suffix, e.g.
    /// `"WEAK_PASSWORD : Password should be at least 6 characters"`.
    pub fn from_provider_code(code: &str) -> AuthError {
        let (head, detail) = match code.split_once(':') {
            Some((h, d)) => (h.trim(), d.trim()),
            None => (code.trim(), ""),
        };
        match head {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "USER_DISABLED" => AuthError::InvalidCredentials,
            "EMAIL_EXISTS" => AuthError::EmailExists,
            "WEAK_PASSWORD" => AuthError::WeakPassword(detail.to_string()),
            "INVALID_EMAIL" | "MISSING_EMAIL" => AuthError::InvalidEmail,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyAttempts,
            other => AuthError::Provider(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_codes() {
        assert_eq!(
            AuthError::from_provider_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        assert_eq!(AuthError::from_provider_code("EMAIL_EXISTS"), AuthError::EmailExists);
        assert_eq!(
            AuthError::from_provider_code(
                "WEAK_PASSWORD : Password should be at least 6 characters"
            ),
            AuthError::WeakPassword("Password should be at least 6 characters".into())
        );
        assert_eq!(
            AuthError::from_provider_code("OPERATION_NOT_ALLOWED"),
            AuthError::Provider("OPERATION_NOT_ALLOWED".into())
        );
    }

    #[test]
    fn test_status_display() {
        let e = InferenceError::Status {
            endpoint: "/recommend_crops".into(),
            status: 503,
        };
        assert_eq!(e.to_string(), "/recommend_crops returned HTTP 503");
        assert!(e.user_message().contains("503"));
    }
}
