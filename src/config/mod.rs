//! Configuration module for the SM-Clone client.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::ClientError;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the user endpoints (`API_USER`)
    pub api_user: String,
    /// Base URL of the post endpoints (`API_POST`)
    pub api_post: String,
    /// Image upload endpoint of the media host
    pub media_upload_url: String,
    /// Fixed `upload_preset` field sent with every upload
    pub media_upload_preset: String,
    /// Fixed `cloud_name` field sent with every upload
    pub media_cloud_name: String,
    /// Pause before redirecting after a logout
    pub redirect_delay: Duration,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Where the session snapshot is kept between runs
    pub session_path: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_user: "http://localhost:3001/user".to_string(),
            api_post: "http://localhost:3001/post".to_string(),
            media_upload_url: "https://api.cloudinary.com/v1_1/delx9uezx/image/upload".to_string(),
            media_upload_preset: "sm-clone".to_string(),
            media_cloud_name: "delx9uezx".to_string(),
            redirect_delay: Duration::from_millis(3000),
            request_timeout: Duration::from_secs(30),
            session_path: PathBuf::from("./data/session.json"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_user = lookup("SM_API_USER")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_user);

        let api_post = lookup("SM_API_POST")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_post);

        let media_upload_url = lookup("SM_MEDIA_UPLOAD_URL").unwrap_or(defaults.media_upload_url);
        let media_upload_preset =
            lookup("SM_MEDIA_UPLOAD_PRESET").unwrap_or(defaults.media_upload_preset);
        let media_cloud_name = lookup("SM_MEDIA_CLOUD_NAME").unwrap_or(defaults.media_cloud_name);

        let redirect_delay = match lookup("SM_REDIRECT_DELAY_MS") {
            Some(raw) => Duration::from_millis(parse_number("SM_REDIRECT_DELAY_MS", &raw)?),
            None => defaults.redirect_delay,
        };

        let request_timeout = match lookup("SM_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number("SM_REQUEST_TIMEOUT_SECS", &raw)?),
            None => defaults.request_timeout,
        };

        let session_path = lookup("SM_SESSION_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.session_path);

        let log_level = lookup("SM_LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            api_user,
            api_post,
            media_upload_url,
            media_upload_preset,
            media_cloud_name,
            redirect_delay,
            request_timeout,
            session_path,
            log_level,
        })
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u64, ClientError> {
    raw.trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("Invalid {} value: {:?}", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(|_| None).unwrap();

        assert_eq!(config.api_user, "http://localhost:3001/user");
        assert_eq!(config.api_post, "http://localhost:3001/post");
        assert_eq!(config.media_upload_preset, "sm-clone");
        assert_eq!(config.media_cloud_name, "delx9uezx");
        assert_eq!(config.redirect_delay, Duration::from_millis(3000));
        assert_eq!(config.session_path, PathBuf::from("./data/session.json"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SM_API_USER", "https://api.example.com/user/"),
            ("SM_REDIRECT_DELAY_MS", "0"),
            ("SM_REQUEST_TIMEOUT_SECS", "5"),
            ("SM_LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.api_user, "https://api.example.com/user");
        assert_eq!(config.redirect_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let err = Config::from_lookup(lookup_from(&[("SM_REDIRECT_DELAY_MS", "soon")]))
            .unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }
}
