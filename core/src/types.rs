//! Issue DTOs for the typed wrappers in `issues`.
//!
//! # Design
//! These mirror the mock server's schema but are defined independently;
//! integration tests catch drift between the two crates. Only fields the
//! wrappers use are strongly typed; `milestone` stays opaque.

use serde::{Deserialize, Serialize};

use crate::params::RequestOptions;

/// A GitLab user as embedded in issues (author, assignee).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub state: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Opened,
    Closed,
    Reopened,
}

/// Labels come back as names; older fixtures carry numeric ids.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Label {
    Id(i64),
    Name(String),
}

/// A single issue returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub id: i64,
    pub iid: i64,
    pub project_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub state: IssueState,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub milestone: Option<serde_json::Value>,
    #[serde(default)]
    pub assignee: Option<User>,
    pub author: User,
    #[serde(default)]
    pub subscribed: bool,
}

/// Fields for creating an issue. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: Option<String>,
    pub labels: Vec<String>,
    pub assignee_id: Option<i64>,
    pub milestone_id: Option<i64>,
}

impl NewIssue {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Parameters in the order GitLab documents them.
    pub(crate) fn apply(&self, mut options: RequestOptions) -> RequestOptions {
        options = options.param("title", &self.title);
        if let Some(description) = &self.description {
            options = options.param("description", description);
        }
        if !self.labels.is_empty() {
            options = options.param("labels", self.labels.clone());
        }
        if let Some(assignee_id) = self.assignee_id {
            options = options.param("assignee_id", assignee_id);
        }
        if let Some(milestone_id) = self.milestone_id {
            options = options.param("milestone_id", milestone_id);
        }
        options
    }
}

/// State transition requested by an edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    Close,
    Reopen,
}

impl StateEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            StateEvent::Close => "close",
            StateEvent::Reopen => "reopen",
        }
    }
}

/// Fields for editing an issue. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditIssue {
    pub title: Option<String>,
    pub description: Option<String>,
    pub labels: Option<Vec<String>>,
    pub assignee_id: Option<i64>,
    pub state_event: Option<StateEvent>,
}

impl EditIssue {
    pub(crate) fn apply(&self, mut options: RequestOptions) -> RequestOptions {
        if let Some(title) = &self.title {
            options = options.param("title", title);
        }
        if let Some(description) = &self.description {
            options = options.param("description", description);
        }
        if let Some(labels) = &self.labels {
            options = options.param("labels", labels.clone());
        }
        if let Some(assignee_id) = self.assignee_id {
            options = options.param("assignee_id", assignee_id);
        }
        if let Some(event) = self.state_event {
            options = options.param("state_event", event.as_str());
        }
        options
    }
}
