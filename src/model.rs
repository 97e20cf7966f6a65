// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the read-only projections of Jira state (projects, boards, sprints, issues, changelog) and report rows
// role: model/types
// outputs: Plain structs shared by resolution, query building, staleness and rendering; report types are Serialize
// invariants: Nothing here is persisted; every value is fetched fresh per invocation
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Status name that makes an issue eligible for staleness checks.
pub const IN_PROGRESS: &str = "In Progress";

/// Placeholder rendered when an issue has no status.
pub const MISSING_STATUS: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  pub id: String,
  pub key: String,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
  pub id: u64,
  pub name: String,
  pub project_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
  Future,
  Active,
  Closed,
  #[serde(untagged)]
  Other(String),
}

impl SprintState {
  pub fn parse(raw: &str) -> Self {
    match raw.to_ascii_lowercase().as_str() {
      "future" => SprintState::Future,
      "active" => SprintState::Active,
      "closed" => SprintState::Closed,
      _ => SprintState::Other(raw.to_string()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      SprintState::Future => "future",
      SprintState::Active => "active",
      SprintState::Closed => "closed",
      SprintState::Other(s) => s,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
  pub id: u64,
  pub name: String,
  pub state: SprintState,
  pub start: Option<DateTime<Utc>>,
  pub end: Option<DateTime<Utc>>,
}

impl Sprint {
  /// Both dates, when the sprint has them. Defines `[start, end)`.
  pub fn interval(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    match (self.start, self.end) {
      (Some(s), Some(e)) => Some((s, e)),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTransition {
  pub field: String,
  pub from: Option<String>,
  pub to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
  pub created: DateTime<Utc>,
  pub items: Vec<FieldTransition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
  pub id: String,
  pub key: String,
  pub summary: String,
  pub status: Option<String>,
  pub assignee: Option<String>,
  pub updated: Option<DateTime<Utc>>,
  /// Ordered as returned by the changelog expansion; `None` when not requested.
  pub history: Option<Vec<HistoryEntry>>,
}

impl Issue {
  pub fn status_or_placeholder(&self) -> &str {
    self.status.as_deref().unwrap_or(MISSING_STATUS)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
  pub key: String,
  pub summary: String,
  pub status: String,
  pub age_days: Option<i64>,
  pub assignee: String,
  pub flagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SprintRow {
  pub name: String,
  pub state: SprintState,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
  pub project: String,
  pub project_name: String,
  pub board: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sprint: Option<String>,
  pub query: String,
  pub count: usize,
  pub flagged: usize,
  pub rows: Vec<ReportRow>,
}
