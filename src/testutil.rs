// In-memory JiraApi used by unit tests.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::RemoteError;
use crate::jira_api::JiraApi;
use crate::model::{Board, FieldTransition, HistoryEntry, Issue, Project, Sprint, SprintState};

#[derive(Default)]
pub struct FakeJira {
  pub project: Option<Project>,
  pub boards: Vec<Board>,
  pub sprints: Vec<Sprint>,
  pub search: Option<Vec<Issue>>,
  pub histories: HashMap<String, Issue>,
  pub queries: Mutex<Vec<String>>,
  pub history_fetches: Mutex<Vec<String>>,
}

fn not_found(what: &str) -> RemoteError {
  RemoteError::Status {
    url: format!("fake:{}", what),
    code: 404,
  }
}

impl JiraApi for FakeJira {
  fn project(&self, key: &str) -> Result<Project, RemoteError> {
    self.project.clone().ok_or_else(|| not_found(key))
  }

  fn boards(&self, _project_key: &str, name: &str) -> Result<Vec<Board>, RemoteError> {
    Ok(self.boards.iter().filter(|b| b.name == name).cloned().collect())
  }

  fn sprints(&self, _board_id: u64) -> Result<Vec<Sprint>, RemoteError> {
    Ok(self.sprints.clone())
  }

  fn search_issues(&self, jql: &str) -> Result<Vec<Issue>, RemoteError> {
    self.queries.lock().unwrap().push(jql.to_string());
    self.search.clone().ok_or_else(|| RemoteError::Transport {
      url: "fake:search".into(),
      message: "connection refused".into(),
    })
  }

  fn issue_with_history(&self, issue_id: &str) -> Result<Issue, RemoteError> {
    self.history_fetches.lock().unwrap().push(issue_id.to_string());
    self.histories.get(issue_id).cloned().ok_or_else(|| not_found(issue_id))
  }
}

pub fn day(n: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap() + Duration::days(n)
}

pub fn project() -> Project {
  Project {
    id: "10000".into(),
    key: "PROJ".into(),
    name: "Project".into(),
  }
}

pub fn board(id: u64, name: &str) -> Board {
  Board {
    id,
    name: name.into(),
    project_key: "PROJ".into(),
  }
}

pub fn sprint(id: u64, name: &str, start: i64, end: i64) -> Sprint {
  Sprint {
    id,
    name: name.into(),
    state: SprintState::Active,
    start: Some(day(start)),
    end: Some(day(end)),
  }
}

pub fn issue(id: &str, status: Option<&str>) -> Issue {
  Issue {
    id: id.into(),
    key: format!("PROJ-{}", id),
    summary: format!("issue {}", id),
    status: status.map(|s| s.to_string()),
    assignee: Some("bob".into()),
    updated: Some(day(12)),
    history: None,
  }
}

pub fn with_progress_since(mut issue: Issue, entered: DateTime<Utc>) -> Issue {
  issue.history = Some(vec![HistoryEntry {
    created: entered,
    items: vec![FieldTransition {
      field: "status".into(),
      from: Some("To Do".into()),
      to: Some("In Progress".into()),
    }],
  }]);
  issue
}
