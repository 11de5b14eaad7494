//! Typed pass-throughs over `GitlabClient::request` for the issues API.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::GitlabClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::params::RequestOptions;
use crate::types::{EditIssue, Issue, NewIssue};

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    Ok(serde_json::from_value(value)?)
}

/// `GET issues`: every issue visible to the token's user.
pub fn list_issues(client: &GitlabClient) -> Result<Vec<Issue>, ApiError> {
    decode(client.request("issues", &RequestOptions::new())?)
}

/// `GET projects/:id/issues`, optionally filtered by `state`.
pub fn list_project_issues(
    client: &GitlabClient,
    project_id: i64,
    state: Option<&str>,
) -> Result<Vec<Issue>, ApiError> {
    let mut options = RequestOptions::new();
    if let Some(state) = state {
        options = options.param("state", state);
    }
    decode(client.request(&format!("projects/{project_id}/issues"), &options)?)
}

/// `POST projects/:id/issues`.
pub fn create_project_issue(
    client: &GitlabClient,
    project_id: i64,
    issue: &NewIssue,
) -> Result<Issue, ApiError> {
    let options = issue.apply(RequestOptions::new().method(HttpMethod::Post));
    decode(client.request(&format!("projects/{project_id}/issues"), &options)?)
}

/// `PUT projects/:id/issues/:issue_id`.
pub fn edit_project_issue(
    client: &GitlabClient,
    project_id: i64,
    issue_id: i64,
    edit: &EditIssue,
) -> Result<Issue, ApiError> {
    let options = edit.apply(RequestOptions::new().method(HttpMethod::Put));
    decode(client.request(&format!("projects/{project_id}/issues/{issue_id}"), &options)?)
}
