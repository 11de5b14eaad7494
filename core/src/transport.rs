//! The single network seam: executes one `HttpRequest` and returns the
//! `HttpResponse` as data.
//!
//! # Design
//! Transports never interpret status codes. A 404 is a successful
//! round-trip from the transport's point of view; `GitlabClient` decides
//! what it means. Only failures that produce no response at all become
//! `ApiError::Transport`.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one HTTP round-trip. No retries, no caching.
pub trait Transport: Send + Sync {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<F> Transport for F
where
    F: Fn(HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync,
{
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self(request)
    }
}

/// Blocking transport backed by a `ureq::Agent`.
///
/// The agent is configured to return 4xx/5xx responses as data. Connection
/// pooling is whatever the agent does internally.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Bound every call, connect through body read, by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        debug!(method = %method, url = %url, "sending request");

        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send_with_body(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send_with_body(with_headers(self.agent.put(&url), &headers), body),
            HttpMethod::Patch => {
                send_with_body(with_headers(self.agent.patch(&url), &headers), body)
            }
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    value.to_str().unwrap_or_default().to_string(),
                )
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(method = %method, url = %url, status, "received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder
            .content_type("application/json")
            .send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
