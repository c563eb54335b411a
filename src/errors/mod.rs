//! Error handling module for the SM-Clone client.
//!
//! Provides a single error type for every failure a client operation can hit,
//! with stable error codes and the message shown to the user.

use serde::{Deserialize, Serialize};

use crate::validation::FieldErrors;

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_AUTHENTICATED: &str = "NOT_AUTHENTICATED";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const SERVER_ERROR: &str = "SERVER_ERROR";
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const INVALID_FILE_TYPE: &str = "INVALID_FILE_TYPE";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Message used when a file is rejected before upload.
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Invalid file type";

/// Client error type.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Client-side validation failed; nothing was sent
    Validation(FieldErrors),
    /// The API answered 403 to a protected request
    Forbidden(String),
    /// A protected request was attempted without a token
    NotAuthenticated,
    /// The API answered with a non-2xx status other than 403
    Server { status: u16, message: String },
    /// The request never produced a response
    Transport(String),
    /// File rejected before upload
    InvalidFileType(String),
    /// Response body could not be decoded
    Decode(String),
    /// Invalid configuration value
    Config(String),
    /// Local I/O failure
    Io(String),
}

impl ClientError {
    /// Get the HTTP status code for this error, if the server produced one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Forbidden(_) => Some(403),
            ClientError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => codes::VALIDATION_ERROR,
            ClientError::Forbidden(_) => codes::FORBIDDEN,
            ClientError::NotAuthenticated => codes::NOT_AUTHENTICATED,
            ClientError::Server { .. } => codes::SERVER_ERROR,
            ClientError::Transport(_) => codes::TRANSPORT_ERROR,
            ClientError::InvalidFileType(_) => codes::INVALID_FILE_TYPE,
            ClientError::Decode(_) => codes::DECODE_ERROR,
            ClientError::Config(_) => codes::CONFIG_ERROR,
            ClientError::Io(_) => codes::IO_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            ClientError::Validation(errors) => errors.summary(),
            ClientError::Forbidden(msg) => msg.clone(),
            ClientError::NotAuthenticated => "You are not logged in".to_string(),
            ClientError::Server { message, .. } => message.clone(),
            ClientError::Transport(msg) => msg.clone(),
            ClientError::InvalidFileType(msg) => msg.clone(),
            ClientError::Decode(msg) => msg.clone(),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Io(msg) => msg.clone(),
        }
    }

    /// Whether this error forces the session to be dropped.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(self, ClientError::Forbidden(_) | ClientError::NotAuthenticated)
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Decode error: {:?}", err);
            return ClientError::Decode(format!("Invalid response body: {}", err));
        }
        tracing::error!("Transport error: {:?}", err);
        ClientError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        ClientError::Decode(format!("JSON error: {}", err))
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("I/O error: {:?}", err);
        ClientError::Io(err.to_string())
    }
}

impl From<FieldErrors> for ClientError {
    fn from(errors: FieldErrors) -> Self {
        ClientError::Validation(errors)
    }
}

/// Error body returned by the SM-Clone API.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract the server-provided message from a raw response body.
    ///
    /// Bodies that are not JSON, or JSON without a non-empty `message`, yield `None`.
    pub fn message_from(raw: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(raw)
            .ok()
            .and_then(|body| body.message)
            .filter(|message| !message.trim().is_empty())
    }
}

/// Generic message for an HTTP failure without a server message.
pub fn status_message(status: u16) -> String {
    format!("Request failed with status code {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_from_json_body() {
        let raw = r#"{"message":"User does not exist."}"#;
        assert_eq!(
            ErrorBody::message_from(raw),
            Some("User does not exist.".to_string())
        );
    }

    #[test]
    fn test_message_from_non_json_body() {
        assert_eq!(ErrorBody::message_from("<html>Bad Gateway</html>"), None);
        assert_eq!(ErrorBody::message_from(""), None);
    }

    #[test]
    fn test_message_from_blank_message() {
        assert_eq!(ErrorBody::message_from(r#"{"message":"  "}"#), None);
        assert_eq!(ErrorBody::message_from(r#"{"error":"x"}"#), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ClientError::Forbidden("x".into()).status_code(), Some(403));
        assert_eq!(
            ClientError::Server {
                status: 500,
                message: "boom".into()
            }
            .status_code(),
            Some(500)
        );
        assert_eq!(ClientError::Transport("down".into()).status_code(), None);
    }

    #[test]
    fn test_authorization_failures() {
        assert!(ClientError::Forbidden("expired".into()).is_authorization_failure());
        assert!(ClientError::NotAuthenticated.is_authorization_failure());
        assert!(!ClientError::Server {
            status: 401,
            message: "nope".into()
        }
        .is_authorization_failure());
    }

    #[test]
    fn test_display_includes_code() {
        let err = ClientError::InvalidFileType(INVALID_FILE_TYPE_MESSAGE.to_string());
        assert_eq!(err.to_string(), "INVALID_FILE_TYPE: Invalid file type");
        assert_eq!(status_message(404), "Request failed with status code 404");
    }
}
