//! Request builder and response parser for GitLab-style REST endpoints.
//!
//! # Design
//! `GitlabClient` holds an immutable `Config` and a shared `Transport` and
//! carries no mutable state between calls. Every call is split into
//! `build_request` (pure), one `Transport::send`, and `parse_response`
//! (pure), so the I/O boundary stays explicit and both halves can be
//! exercised without a network.
//!
//! Parameters are written to the query string for every method, POST and
//! PUT included, and the body is left empty. This matches what GitLab v3
//! accepts for issue creation and editing.

use std::sync::Arc;

use serde_json::Value;

use crate::config::Config;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::params::RequestOptions;
use crate::transport::{Transport, UreqTransport};

/// Header carrying the private token on every request.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Client bound to one `Config`. Cheap to clone and safe to share across
/// threads; concurrent calls do not coordinate.
#[derive(Clone)]
pub struct GitlabClient {
    config: Config,
    transport: Arc<dyn Transport>,
}

impl GitlabClient {
    /// Client using the default blocking `UreqTransport`.
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, UreqTransport::new())
    }

    pub fn with_transport(config: Config, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Build the fully-qualified request for `path` without sending it.
    pub fn build_request(&self, path: &str, options: &RequestOptions) -> HttpRequest {
        let mut url = format!("{}/{}", self.config.host(), path.trim_start_matches('/'));
        let query = options.params.to_query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        HttpRequest {
            method: options.method,
            url,
            headers: vec![(
                PRIVATE_TOKEN_HEADER.to_string(),
                self.config.token().to_string(),
            )],
            body: None,
        }
    }

    /// Decode a 2xx body as JSON; any other status becomes `ApiError::Http`.
    /// A 2xx body that is not JSON, empty included, is `ApiError::Decode`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }

    /// Build, send once, and parse.
    pub fn request(&self, path: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        let request = self.build_request(path, options);
        let response = self.transport.send(request)?;
        self.parse_response(response)
    }
}

impl std::fmt::Debug for GitlabClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitlabClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// One-shot form: `request(config, path, options)` with the default
/// transport. Suitable as the request function for `Credentials::call`.
pub fn request(config: &Config, path: &str, options: &RequestOptions) -> Result<Value, ApiError> {
    GitlabClient::new(config.clone()).request(path, options)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;

    const HOST: &str = "http://foo.gitlab.com/api/v3";

    fn config() -> Config {
        Config::new(HOST, "abc123").unwrap()
    }

    fn client() -> GitlabClient {
        GitlabClient::new(config())
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn assert_send_sync<T: Send + Sync + Clone>() {}

    #[test]
    fn client_is_shareable_across_threads() {
        assert_send_sync::<GitlabClient>();
    }

    #[test]
    fn get_without_params_targets_bare_path() {
        let req = client().build_request("issues", &RequestOptions::default());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://foo.gitlab.com/api/v3/issues");
        assert_eq!(
            req.headers,
            vec![("PRIVATE-TOKEN".to_string(), "abc123".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn leading_slash_on_path_is_not_doubled() {
        let req = client().build_request("/projects/0/issues", &RequestOptions::default());
        assert_eq!(req.url, "http://foo.gitlab.com/api/v3/projects/0/issues");
    }

    #[test]
    fn get_with_params_appends_query() {
        let options = RequestOptions::new().param("state", "closed");
        let req = client().build_request("projects/0/issues", &options);
        assert_eq!(
            req.url,
            "http://foo.gitlab.com/api/v3/projects/0/issues?state=closed"
        );
    }

    #[test]
    fn post_params_go_to_query_string() {
        let options = RequestOptions::new()
            .method(HttpMethod::Post)
            .param("title", "New Issue")
            .param("labels", "iteration-1")
            .param("assignee_id", 1);
        let req = client().build_request("projects/0/issues", &options);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "http://foo.gitlab.com/api/v3/projects/0/issues?title=New%20Issue&labels=iteration-1&assignee_id=1"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn put_uses_requested_method() {
        let options = RequestOptions::new()
            .method(HttpMethod::Put)
            .param("state_event", "close");
        let req = client().build_request("projects/0/issues/5", &options);
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.url,
            "http://foo.gitlab.com/api/v3/projects/0/issues/5?state_event=close"
        );
    }

    #[test]
    fn parse_returns_body_unmodified() {
        let body = json!([{"id": 0, "title": "foo"}, {"id": 1, "title": "bar"}]);
        let value = client()
            .parse_response(response(200, &body.to_string()))
            .unwrap();
        assert_eq!(value, body);
    }

    #[test]
    fn parse_accepts_201() {
        let value = client()
            .parse_response(response(201, r#"{"id":5}"#))
            .unwrap();
        assert_eq!(value, json!({"id": 5}));
    }

    #[test]
    fn parse_empty_success_is_decode_error() {
        for body in ["", "   \n"] {
            let err = client().parse_response(response(200, body)).unwrap_err();
            assert!(matches!(err, ApiError::Decode(_)), "body {body:?}: {err:?}");
        }
        let err = client().parse_response(response(204, "")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn parse_non_success_keeps_status_and_body() {
        let err = client()
            .parse_response(response(404, r#"{"message":"404 Not found"}"#))
            .unwrap_err();
        match err {
            ApiError::Http { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, r#"{"message":"404 Not found"}"#);
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[test]
    fn parse_bad_json_is_decode_error() {
        let err = client()
            .parse_response(response(200, "<html>"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn request_sends_exactly_once() {
        let seen: Arc<Mutex<Vec<HttpRequest>>> = Arc::default();
        let recorder = Arc::clone(&seen);
        let record = move |req: HttpRequest| -> Result<HttpResponse, ApiError> {
            recorder.lock().unwrap().push(req);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: "[]".to_string(),
            })
        };
        let client = GitlabClient::with_transport(config(), record);

        let value = client
            .request("issues", &RequestOptions::default())
            .unwrap();
        assert_eq!(value, json!([]));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].url, "http://foo.gitlab.com/api/v3/issues");
        assert_eq!(seen[0].header("PRIVATE-TOKEN"), Some("abc123"));
    }

    #[test]
    fn transport_errors_propagate() {
        let refuse = |_: HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        };
        let client = GitlabClient::with_transport(config(), refuse);
        let err = client
            .request("issues", &RequestOptions::default())
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
