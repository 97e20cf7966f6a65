// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compose the single JQL predicate sent to the search endpoint
// role: query/builder
// inputs: status-exclusion flag, optional sprint name, optional (role, name) actor
// outputs: Predicate string; empty when no clause applies
// invariants:
// - Clause order is fixed: status exclusion, sprint, actor; joined with " and "
// - Every user-supplied name passes through quote_value; plain names stay verbatim
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

pub const STATUS_EXCLUSION: &str = "Status NOT IN (Resolved,Closed)";

/// Field an actor-name clause applies to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
  Assignee,
  Reporter,
}

impl ActorRole {
  pub fn field(self) -> &'static str {
    match self {
      ActorRole::Assignee => "assignee",
      ActorRole::Reporter => "reporter",
    }
  }
}

impl fmt::Display for ActorRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.field())
  }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Actor {
  pub role: ActorRole,
  pub name: String,
}

impl Actor {
  pub fn new(role: ActorRole, name: impl Into<String>) -> Self {
    Self { role, name: name.into() }
  }
}

/// JQL words that would change the meaning of an unquoted value.
const KEYWORDS: &[&str] = &["and", "or", "not", "in", "is", "was", "order", "by", "empty", "null"];

/// Render a name for a `field = value` clause.
///
/// Names built from ordinary characters go in verbatim (`Sprint 5`, `alice`);
/// anything else is double-quoted with `\` and `"` escaped.
pub fn quote_value(name: &str) -> String {
  static PLAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._@+/:-]*$").unwrap());

  let has_keyword = name
    .split_whitespace()
    .any(|w| KEYWORDS.iter().any(|k| w.eq_ignore_ascii_case(k)));

  if PLAIN.is_match(name) && !name.ends_with(' ') && !has_keyword {
    return name.to_string();
  }

  let mut out = String::with_capacity(name.len() + 2);
  out.push('"');
  for c in name.chars() {
    if c == '"' || c == '\\' {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('"');
  out
}

/// Build the search predicate. Returns `""` when no clause applies.
pub fn build(exclude_resolved_closed: bool, sprint_name: Option<&str>, actor: Option<&Actor>) -> String {
  let mut clauses: Vec<String> = Vec::with_capacity(3);

  if exclude_resolved_closed {
    clauses.push(STATUS_EXCLUSION.to_string());
  }

  if let Some(name) = sprint_name {
    clauses.push(format!("sprint = {}", quote_value(name)));
  }

  if let Some(a) = actor {
    clauses.push(format!("{} = {}", a.role, quote_value(&a.name)));
  }

  clauses.join(" and ")
}
