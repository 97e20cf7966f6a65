// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble a report: board context → sprint → predicate → search → per-issue staleness → rows
// role: processing/orchestrator
// inputs: &dyn JiraApi, ReportRequest (project, board, FilterIntent, jobs), now
// outputs: Report (query, sprint, rows) or sprint listing rows
// side_effects: Remote calls through JiraApi only
// invariants:
// - Row order equals the order returned by the search call, regardless of jobs
// - A history fetch failure only clears that issue's flag
// - Empty predicate is refused unless the intent asks for every issue
// errors: ReportError (resolution, remote with context, empty predicate)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::context::resolve_context;
use crate::error::{RemoteContext, ReportError, ResolutionError};
use crate::jira_api::JiraApi;
use crate::model::{IN_PROGRESS, Issue, Report, ReportRow, SprintRow};
use crate::query::{self, Actor};
use crate::sprint::{self, ActiveFallback, SprintSelection};
use crate::staleness::is_stale;

pub const DEFAULT_JOBS: usize = 4;

/// What the user asked to see.
#[derive(Debug, Clone)]
pub struct FilterIntent {
  /// `None` shows issues regardless of assignee/reporter.
  pub actor: Option<Actor>,
  pub sprint: SprintSelection,
  pub exclude_resolved_closed: bool,
  /// Days an issue may stay "In Progress" before it is flagged; 0 disables.
  pub warn_after_days: u32,
  pub active_fallback: ActiveFallback,
  /// Permit an empty predicate (every issue in the instance).
  pub match_all: bool,
}

impl Default for FilterIntent {
  fn default() -> Self {
    Self {
      actor: None,
      sprint: SprintSelection::None,
      exclude_resolved_closed: true,
      warn_after_days: 0,
      active_fallback: ActiveFallback::default(),
      match_all: false,
    }
  }
}

#[derive(Debug, Clone)]
pub struct ReportRequest {
  pub project: String,
  pub board: String,
  pub intent: FilterIntent,
  pub jobs: usize,
}

fn describe(selection: &SprintSelection) -> String {
  match selection {
    SprintSelection::ByName(name) => format!("sprint {}", name),
    SprintSelection::Active => "active sprint".to_string(),
    SprintSelection::None => "sprint".to_string(),
  }
}

pub fn assemble(api: &dyn JiraApi, req: &ReportRequest, now: DateTime<Utc>) -> Result<Report, ReportError> {
  let intent = &req.intent;

  // Phase 1: board context
  let ctx = resolve_context(api, &req.project, &req.board)?;

  // Phase 2: sprint context
  let sprint = match &intent.sprint {
    SprintSelection::None => None,
    selection => {
      let sprints = api.sprints(ctx.board.id).remote_context("failed to get jira sprints")?;
      let found = sprint::resolve(&sprints, selection, now, intent.active_fallback)?;
      let found = found.ok_or_else(|| ResolutionError::not_found(describe(selection)))?;
      tracing::info!(sprint = %found.name, sprint_id = found.id, "resolved sprint");
      Some(found)
    }
  };

  // Phase 3: predicate
  let jql = query::build(
    intent.exclude_resolved_closed,
    sprint.as_ref().map(|s| s.name.as_str()),
    intent.actor.as_ref(),
  );

  if jql.is_empty() && !intent.match_all {
    return Err(ReportError::EmptyPredicate);
  }
  tracing::debug!(jql = %jql, "searching issues");

  // Phase 4: search
  let issues = api.search_issues(&jql).remote_context("failed to search issues")?;

  if issues.is_empty() {
    tracing::info!("No issue found");
  }

  // Phase 5: staleness and projection
  let flags = flag_stale(api, &issues, intent.warn_after_days, now, req.jobs);
  let rows: Vec<ReportRow> = issues
    .iter()
    .zip(flags)
    .map(|(issue, flagged)| project_row(issue, flagged, now))
    .collect();

  Ok(Report {
    project: ctx.project.key,
    project_name: ctx.project.name,
    board: ctx.board.name,
    sprint: sprint.map(|s| s.name),
    query: jql,
    count: rows.len(),
    flagged: rows.iter().filter(|r| r.flagged).count(),
    rows,
  })
}

fn project_row(issue: &Issue, flagged: bool, now: DateTime<Utc>) -> ReportRow {
  ReportRow {
    key: issue.key.clone(),
    summary: issue.summary.clone(),
    status: issue.status_or_placeholder().to_string(),
    age_days: issue.updated.map(|u| (now - u).num_days()),
    assignee: issue.assignee.clone().unwrap_or_default(),
    flagged,
  }
}

fn check_one(api: &dyn JiraApi, issue: &Issue, threshold: u32, now: DateTime<Utc>) -> bool {
  if issue.status.as_deref() != Some(IN_PROGRESS) {
    return false;
  }

  if issue.history.is_some() {
    return is_stale(issue, IN_PROGRESS, threshold, now);
  }

  match api.issue_with_history(&issue.id) {
    Ok(detailed) => is_stale(&detailed, IN_PROGRESS, threshold, now),
    Err(e) => {
      tracing::warn!(issue = %issue.key, error = %e, "could not fetch changelog; not flagging");
      false
    }
  }
}

/// One flag per issue, in input order. History fetches fan out over at most `jobs` threads.
pub fn flag_stale(api: &dyn JiraApi, issues: &[Issue], threshold: u32, now: DateTime<Utc>, jobs: usize) -> Vec<bool> {
  if threshold == 0 {
    return vec![false; issues.len()];
  }

  let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs.max(1)).build();

  match pool {
    Ok(pool) => pool.install(|| {
      issues
        .par_iter()
        .map(|issue| check_one(api, issue, threshold, now))
        .collect()
    }),
    Err(e) => {
      tracing::warn!(error = %e, "thread pool unavailable; checking issues sequentially");
      issues.iter().map(|issue| check_one(api, issue, threshold, now)).collect()
    }
  }
}

pub fn list_sprints(api: &dyn JiraApi, project: &str, board: &str) -> Result<Vec<SprintRow>, ReportError> {
  let ctx = resolve_context(api, project, board)?;
  let sprints = api.sprints(ctx.board.id).remote_context("failed to get jira sprints")?;

  Ok(
    sprints
      .into_iter()
      .map(|s| SprintRow {
        name: s.name,
        state: s.state,
      })
      .collect(),
  )
}
