//! Stored credentials: supply a `Config` once, reuse it at every call site.

use crate::client::GitlabClient;
use crate::config::Config;
use crate::params::RequestOptions;

/// Holds a `Config` and hands it to whatever request function the caller
/// picks. Adds no behavior of its own: the result is exactly what
/// `request_fn(&config, path, options)` returns.
#[derive(Debug, Clone)]
pub struct Credentials {
    config: Config,
}

impl Credentials {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn call<F, T>(&self, request_fn: F, path: &str, options: &RequestOptions) -> T
    where
        F: FnOnce(&Config, &str, &RequestOptions) -> T,
    {
        request_fn(&self.config, path, options)
    }

    /// A client bound to these credentials with the default transport.
    pub fn client(&self) -> GitlabClient {
        GitlabClient::new(self.config.clone())
    }
}

impl From<Config> for Credentials {
    fn from(config: Config) -> Self {
        Self::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    #[test]
    fn call_forwards_config_path_and_options() {
        let config = Config::new("http://foo.gitlab.com/api/v3", "abc123").unwrap();
        let creds = Credentials::new(config);
        let options = RequestOptions::new()
            .method(HttpMethod::Put)
            .param("state_event", "close");

        let seen = creds.call(
            |config: &Config, path: &str, opts: &RequestOptions| {
                (
                    config.host().to_string(),
                    config.token().to_string(),
                    path.to_string(),
                    opts.clone(),
                )
            },
            "projects/0/issues/5",
            &options,
        );

        assert_eq!(seen.0, "http://foo.gitlab.com/api/v3");
        assert_eq!(seen.1, "abc123");
        assert_eq!(seen.2, "projects/0/issues/5");
        assert_eq!(seen.3, options);
    }

    #[test]
    fn call_matches_building_directly() {
        let config = Config::new("http://foo.gitlab.com/api/v3", "abc123").unwrap();
        let creds = Credentials::from(config.clone());
        let options = RequestOptions::new().param("state", "closed");

        let via_creds = creds.call(
            |config: &Config, path: &str, opts: &RequestOptions| {
                GitlabClient::new(config.clone()).build_request(path, opts)
            },
            "projects/0/issues",
            &options,
        );
        let direct = GitlabClient::new(config).build_request("projects/0/issues", &options);
        assert_eq!(via_creds, direct);
    }
}
