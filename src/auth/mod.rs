//! Bearer token handling.
//!
//! Protected SM-Clone endpoints expect `Authorization: Bearer <token>`.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::errors::ClientError;

/// Scheme prefix of the authorization header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Build the `Authorization` header value for a token.
///
/// The value is marked sensitive so it never shows up in debug output.
pub fn authorization_value(token: &str) -> Result<HeaderValue, ClientError> {
    let mut value = HeaderValue::from_str(&format!("{}{}", BEARER_PREFIX, token))
        .map_err(|_| ClientError::Config("Token contains invalid header characters".to_string()))?;
    value.set_sensitive(true);
    Ok(value)
}

/// Extract the bearer token from request headers.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}
