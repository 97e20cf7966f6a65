use chrono::{DateTime, TimeDelta, Utc};

use crate::model::{IN_PROGRESS, Issue};

const STATUS_FIELD: &str = "status";

/// Whether `issue` has sat in "In Progress" for longer than `threshold_days`.
///
/// Only issues currently "In Progress" are eligible, and only their changelog
/// counts as evidence: without history the answer is `false`. Any entry into
/// "In Progress" older than the cutoff flags the issue, including entries that
/// were later followed by a move out and back in.
pub fn is_stale(issue: &Issue, current_status: &str, threshold_days: u32, now: DateTime<Utc>) -> bool {
  if threshold_days == 0 || current_status != IN_PROGRESS {
    return false;
  }

  let Some(history) = issue.history.as_ref() else {
    return false;
  };

  // A cutoff before the representable range means no entry can be older than it.
  let Some(cutoff) = TimeDelta::try_days(i64::from(threshold_days)).and_then(|d| now.checked_sub_signed(d)) else {
    return false;
  };

  history.iter().any(|entry| {
    entry.created < cutoff
      && entry
        .items
        .iter()
        .any(|t| t.field.eq_ignore_ascii_case(STATUS_FIELD) && t.to.as_deref() == Some(IN_PROGRESS))
  })
}
