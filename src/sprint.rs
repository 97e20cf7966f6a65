use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::ResolutionError;
use crate::model::Sprint;

/// Which sprint a report should be scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SprintSelection {
  None,
  ByName(String),
  Active,
}

/// What "active" means when no sprint's dates bracket `now`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ActiveFallback {
  /// Use the already-started sprint with the latest end date.
  #[default]
  LatestEnded,
  /// Only a sprint whose interval contains `now` counts as active.
  None,
}

/// Pick the sprint for `selection` out of a board's sprint list.
///
/// `Ok(None)` means nothing matched; callers that need a sprint turn that into
/// a not-found failure. Overlapping active intervals are reported as ambiguous.
pub fn resolve(
  sprints: &[Sprint],
  selection: &SprintSelection,
  now: DateTime<Utc>,
  fallback: ActiveFallback,
) -> Result<Option<Sprint>, ResolutionError> {
  match selection {
    SprintSelection::None => Ok(None),
    SprintSelection::ByName(name) => Ok(sprints.iter().find(|s| &s.name == name).cloned()),
    SprintSelection::Active => resolve_active(sprints, now, fallback),
  }
}

fn resolve_active(
  sprints: &[Sprint],
  now: DateTime<Utc>,
  fallback: ActiveFallback,
) -> Result<Option<Sprint>, ResolutionError> {
  let dated: Vec<(&Sprint, DateTime<Utc>, DateTime<Utc>)> = sprints
    .iter()
    .filter_map(|s| s.interval().map(|(start, end)| (s, start, end)))
    .collect();

  let containing: Vec<&Sprint> = dated
    .iter()
    .filter(|(_, start, end)| *start <= now && now < *end)
    .map(|(s, _, _)| *s)
    .collect();

  match containing.as_slice() {
    [only] => return Ok(Some((*only).clone())),
    [] => {}
    many => {
      return Err(ResolutionError::ambiguous(
        "active sprint",
        many.iter().map(|s| s.name.clone()).collect(),
      ))
    }
  }

  if fallback == ActiveFallback::None {
    return Ok(None);
  }

  // Nothing brackets `now`: take the started sprint that ended most recently.
  let mut best: Option<(&Sprint, DateTime<Utc>)> = None;

  for (s, start, end) in dated.iter() {
    if *start > now {
      continue;
    }
    match best {
      Some((_, best_end)) if *end <= best_end => {}
      _ => best = Some((*s, *end)),
    }
  }

  Ok(best.map(|(s, _)| s.clone()))
}
