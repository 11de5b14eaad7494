//! Client configuration: API origin and private token.

use std::env;

use crate::error::ApiError;

/// Environment variable holding the API origin, versioned prefix included.
pub const URL_ENV: &str = "GITLAB_URL";
/// Environment variable holding the private token.
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Immutable connection settings shared by every call a client makes.
///
/// `host` is the API origin including any versioned prefix, e.g.
/// `http://foo.gitlab.com/api/v3`. A trailing slash is stripped.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    host: String,
    token: String,
}

impl Config {
    pub fn new(host: &str, token: &str) -> Result<Self, ApiError> {
        let host = host.trim_end_matches('/');
        if host.is_empty() {
            return Err(ApiError::Config("host must not be empty".to_string()));
        }
        if token.is_empty() {
            return Err(ApiError::Config("token must not be empty".to_string()));
        }
        Ok(Self {
            host: host.to_string(),
            token: token.to_string(),
        })
    }

    /// Read `GITLAB_URL` and `GITLAB_TOKEN` from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        let host =
            env::var(URL_ENV).map_err(|_| ApiError::Config(format!("{URL_ENV} is not set")))?;
        let token =
            env::var(TOKEN_ENV).map_err(|_| ApiError::Config(format!("{TOKEN_ENV} is not set")))?;
        Self::new(&host, &token)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

// Keeps the token out of debug output and logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::new("http://foo.gitlab.com/api/v3/", "abc123").unwrap();
        assert_eq!(config.host(), "http://foo.gitlab.com/api/v3");
        assert_eq!(config.token(), "abc123");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = Config::new("", "abc123").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn empty_token_is_rejected() {
        let err = Config::new("http://foo.gitlab.com", "").unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = Config::new("http://foo.gitlab.com", "abc123").unwrap();
        let shown = format!("{config:?}");
        assert!(shown.contains("foo.gitlab.com"));
        assert!(!shown.contains("abc123"));
    }
}
