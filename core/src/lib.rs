//! Thin client core for GitLab-style REST APIs.
//!
//! # Overview
//! Turns a `Config` (API origin plus private token) and a call descriptor
//! (path, method, ordered parameters) into one HTTP round-trip and returns
//! the decoded JSON body.
//!
//! # Design
//! - `GitlabClient` is stateless apart from its immutable `Config`.
//! - Each call is `build_request` (pure) → `Transport::send` → `parse_response`
//!   (pure), so the I/O boundary is explicit and swappable.
//! - `Credentials` stores a `Config` so call sites pick a request function
//!   without repeating it.
//! - Exactly one round-trip per call: no retries, caching, or pagination.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod issues;
pub mod params;
pub mod transport;
pub mod types;

pub use client::{request, GitlabClient, PRIVATE_TOKEN_HEADER};
pub use config::Config;
pub use credentials::Credentials;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ParamValue, Params, RequestOptions};
pub use transport::{Transport, UreqTransport};
pub use types::{EditIssue, Issue, IssueState, Label, NewIssue, StateEvent, User};
