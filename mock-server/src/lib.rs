//! In-memory stand-in for the GitLab v3 issues API.
//!
//! Routes live under `/api/v3` and every request must carry a
//! `PRIVATE-TOKEN` header matching the configured token. State is seeded
//! with two fixture issues; timestamps are fixed so responses are
//! reproducible.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

pub const DEFAULT_TOKEN: &str = "abc123";
pub const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

const CREATED_AT: &str = "2016-07-06T09:30:53.064-05:00";
const UPDATED_AT: &str = "2016-07-06T09:35:53.064-05:00";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub state: String,
    pub avatar_url: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: i64,
    pub iid: i64,
    pub project_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub state: String,
    pub created_at: String,
    pub updated_at: String,
    pub labels: Vec<Value>,
    pub milestone: Option<Value>,
    pub assignee: Option<User>,
    pub author: User,
    pub subscribed: bool,
}

#[derive(Deserialize)]
pub struct IssueFilter {
    pub state: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<String>,
    pub assignee_id: Option<i64>,
}

#[derive(Deserialize)]
pub struct EditIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<String>,
    pub assignee_id: Option<i64>,
    pub state_event: Option<String>,
}

pub struct AppState {
    token: String,
    users: Vec<User>,
    issues: RwLock<Vec<Issue>>,
}

pub type Db = Arc<AppState>;

fn fixture_author() -> User {
    User {
        id: 1,
        name: "bar".to_string(),
        username: "var".to_string(),
        state: "active".to_string(),
        avatar_url: None,
        web_url: None,
    }
}

/// Users known to the server. User 1 owns the token.
pub fn seed_users() -> Vec<User> {
    vec![User {
        id: 1,
        name: "jsmapr1".to_string(),
        username: "jsmapr1".to_string(),
        state: "active".to_string(),
        avatar_url: None,
        web_url: None,
    }]
}

/// The two issues every fresh server starts with: one open, one closed,
/// both in project 0.
pub fn seed_issues() -> Vec<Issue> {
    let issue = |id: i64, title: &str, state: &str| Issue {
        id,
        iid: id,
        project_id: 0,
        title: title.to_string(),
        description: Some(String::new()),
        state: state.to_string(),
        created_at: "2016-05-12T08:16:27.337-05:00".to_string(),
        updated_at: "2016-05-12T08:16:27.337-05:00".to_string(),
        labels: vec![json!(0)],
        milestone: None,
        assignee: None,
        author: fixture_author(),
        subscribed: true,
    };
    vec![issue(0, "foo", "opened"), issue(1, "bar", "closed")]
}

pub fn app() -> Router {
    app_with_token(DEFAULT_TOKEN)
}

pub fn app_with_token(token: &str) -> Router {
    let db: Db = Arc::new(AppState {
        token: token.to_string(),
        users: seed_users(),
        issues: RwLock::new(seed_issues()),
    });
    let api = Router::new()
        .route("/issues", get(list_issues))
        .route(
            "/projects/{id}/issues",
            get(list_project_issues).post(create_issue),
        )
        .route(
            "/projects/{id}/issues/{issue_id}",
            put(edit_issue).get(get_issue),
        )
        .route_layer(middleware::from_fn_with_state(db.clone(), require_token))
        .with_state(db);
    Router::new().nest("/api/v3", api)
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "message": message })))
}

async fn require_token(State(db): State<Db>, request: Request, next: Next) -> Response {
    let supplied = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if supplied != Some(db.token.as_str()) {
        return error(StatusCode::UNAUTHORIZED, "401 Unauthorized").into_response();
    }
    next.run(request).await
}

fn split_labels(labels: &str) -> Vec<Value> {
    labels
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| Value::String(l.to_string()))
        .collect()
}

fn find_user(db: &AppState, id: i64) -> Option<User> {
    db.users.iter().find(|u| u.id == id).cloned()
}

async fn list_issues(State(db): State<Db>) -> Json<Vec<Issue>> {
    Json(db.issues.read().await.clone())
}

async fn list_project_issues(
    State(db): State<Db>,
    Path(project_id): Path<i64>,
    Query(filter): Query<IssueFilter>,
) -> Json<Vec<Issue>> {
    let issues = db.issues.read().await;
    Json(
        issues
            .iter()
            .filter(|i| i.project_id == project_id)
            .filter(|i| filter.state.as_deref().map_or(true, |s| i.state == s))
            .cloned()
            .collect(),
    )
}

async fn get_issue(
    State(db): State<Db>,
    Path((project_id, issue_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Issue>> {
    let issues = db.issues.read().await;
    issues
        .iter()
        .find(|i| i.project_id == project_id && i.id == issue_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "404 Not found"))
}

async fn create_issue(
    State(db): State<Db>,
    Path(project_id): Path<i64>,
    Query(input): Query<CreateIssue>,
) -> ApiResult<(StatusCode, Json<Issue>)> {
    let title = input
        .title
        .filter(|t| !t.is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "400 (Bad request) \"title\" not given"))?;
    let author = find_user(&db, 1).unwrap_or_else(fixture_author);
    let assignee = input.assignee_id.and_then(|id| find_user(&db, id));

    let mut issues = db.issues.write().await;
    let id = issues.iter().map(|i| i.id).max().map_or(0, |m| m + 1);
    let iid = issues
        .iter()
        .filter(|i| i.project_id == project_id)
        .map(|i| i.iid)
        .max()
        .map_or(1, |m| m + 1);
    let issue = Issue {
        id,
        iid,
        project_id,
        title,
        description: input.description,
        state: "opened".to_string(),
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        labels: input.labels.as_deref().map(split_labels).unwrap_or_default(),
        milestone: None,
        assignee,
        author,
        subscribed: true,
    };
    debug!(id, project_id, "created issue");
    issues.push(issue.clone());
    Ok((StatusCode::CREATED, Json(issue)))
}

async fn edit_issue(
    State(db): State<Db>,
    Path((project_id, issue_id)): Path<(i64, i64)>,
    Query(input): Query<EditIssue>,
) -> ApiResult<Json<Issue>> {
    let state = match input.state_event.as_deref() {
        None => None,
        Some("close") => Some("closed"),
        Some("reopen") => Some("reopened"),
        Some(_) => {
            return Err(error(
                StatusCode::BAD_REQUEST,
                "400 (Bad request) \"state_event\" is invalid",
            ))
        }
    };
    let assignee = input.assignee_id.map(|id| find_user(&db, id));

    let mut issues = db.issues.write().await;
    let issue = issues
        .iter_mut()
        .find(|i| i.project_id == project_id && i.id == issue_id)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "404 Not found"))?;
    if let Some(title) = input.title {
        issue.title = title;
    }
    if let Some(description) = input.description {
        issue.description = Some(description);
    }
    if let Some(labels) = input.labels {
        issue.labels = split_labels(&labels);
    }
    if let Some(assignee) = assignee {
        issue.assignee = assignee;
    }
    if let Some(state) = state {
        issue.state = state.to_string();
    }
    issue.updated_at = UPDATED_AT.to_string();
    debug!(id = issue.id, project_id, "edited issue");
    Ok(Json(issue.clone()))
}
