// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Small helpers for time handling, logging setup and man page rendering
// role: utilities/helpers
// inputs: Optional --now-override string; verbosity count; clap CommandFactory
// outputs: Effective "now" in UTC, installed tracing subscriber, man page text
// invariants:
// - effective_now is the only place that reads the wall clock
// - init_logging never panics when a subscriber is already installed
// errors: parse_now_override reports the rejected input
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Result, bail};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use clap::CommandFactory;
use tracing_subscriber::{EnvFilter, fmt};

/// Returns the effective "now" given an optional override.
pub fn effective_now(override_now: Option<DateTime<Utc>>) -> DateTime<Utc> {
  override_now.unwrap_or_else(Utc::now)
}

/// Parse a `--now-override` value: RFC 3339, or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  let Some(raw) = raw else {
    return Ok(None);
  };

  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(Some(dt.with_timezone(&Utc)));
  }

  match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
    .ok()
    .and_then(|ndt| ndt.and_local_timezone(Local).single())
  {
    Some(dt) => Ok(Some(dt.with_timezone(&Utc))),
    None => bail!("invalid --now-override {:?}; expected RFC 3339", raw),
  }
}

/// Install a stderr subscriber. `RUST_LOG` wins; otherwise `-v` raises the level.
pub fn init_logging(verbose: u8) {
  let fallback = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
