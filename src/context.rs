use crate::error::{RemoteContext, ReportError, ResolutionError};
use crate::jira_api::JiraApi;
use crate::model::{Board, Project};

/// Project and board a report runs against. Resolved once per invocation.
#[derive(Debug, Clone)]
pub struct BoardContext {
  pub project: Project,
  pub board: Board,
}

pub fn resolve_project(api: &dyn JiraApi, key_or_name: &str) -> Result<Project, ReportError> {
  api
    .project(key_or_name)
    .remote_context(&format!("failed to get jira project {}", key_or_name))
}

/// Exactly one board named `board_name` must exist in the project.
pub fn resolve_board(api: &dyn JiraApi, project_key: &str, board_name: &str) -> Result<Board, ReportError> {
  let mut boards: Vec<Board> = api
    .boards(project_key, board_name)
    .remote_context("failed to get board list")?
    .into_iter()
    .filter(|b| b.project_key == project_key)
    .collect();

  let what = format!("board {} in project {}", board_name, project_key);

  match boards.len() {
    0 => Err(ResolutionError::not_found(what).into()),
    1 => Ok(boards.remove(0)),
    _ => {
      tracing::info!(count = boards.len(), board = board_name, "board lookup returned several matches");
      Err(
        ResolutionError::ambiguous(
          what,
          boards.iter().map(|b| format!("{} (id {})", b.name, b.id)).collect(),
        )
        .into(),
      )
    }
  }
}

pub fn resolve_context(api: &dyn JiraApi, project: &str, board: &str) -> Result<BoardContext, ReportError> {
  let project = resolve_project(api, project)?;
  let board = resolve_board(api, &project.key, board)?;

  tracing::info!(
    project = %project.key,
    project_id = %project.id,
    board = %board.name,
    board_id = board.id,
    "resolved board context"
  );

  Ok(BoardContext { project, board })
}
