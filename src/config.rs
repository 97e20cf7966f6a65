// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build the explicit runtime Config once at startup from JIRA_* environment variables
// role: config/startup
// inputs: Process environment (or any lookup function in tests)
// outputs: Config value passed by reference into API construction and report assembly
// invariants:
// - Every required variable is present and non-empty, or a ConfigError names the first offender
// - Credential accepts only canonical base64, so decode then encode reproduces the configured text byte-for-byte
// - Business logic never reads the environment; only from_env does
// errors: ConfigError (fatal before any remote call)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ConfigError;

pub const ENV_BASE_URL: &str = "JIRA_BASE_URL";
pub const ENV_PROJECT: &str = "JIRA_PROJECT";
pub const ENV_BOARD: &str = "JIRA_BOARD";
pub const ENV_USERNAME: &str = "JIRA_USERNAME";
pub const ENV_PASSWORD: &str = "JIRA_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "JIRA_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Decoded password. Only canonical base64 with no surrounding whitespace is
/// accepted, so re-encoding the secret reproduces the configured text.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
  decoded: String,
}

impl Credential {
  pub fn from_base64(encoded: &str) -> Result<Self, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidCredential {
      var: ENV_PASSWORD,
      reason,
    };

    if encoded.trim() != encoded {
      return Err(invalid("surrounding whitespace".into()));
    }

    let bytes = STANDARD.decode(encoded).map_err(|e| invalid(e.to_string()))?;
    let decoded = String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))?;

    Ok(Self { decoded })
  }

  pub fn secret(&self) -> &str {
    &self.decoded
  }

  /// Re-encode the decoded secret.
  #[cfg(test)]
  pub fn encode(&self) -> String {
    STANDARD.encode(self.decoded.as_bytes())
  }
}

impl fmt::Debug for Credential {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("Credential(<redacted>)")
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub base_url: String,
  pub project: String,
  pub board: String,
  pub username: String,
  pub credential: Credential,
  pub timeout: Duration,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|k| std::env::var(k).ok())
  }

  /// Build from an arbitrary variable lookup. Variables are checked in a fixed
  /// order so the first missing one is always reported.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let required = |var: &'static str| -> Result<String, ConfigError> {
      tracing::debug!(var, "verifying env variable");
      match lookup(var) {
        None => Err(ConfigError::Missing(var)),
        Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(var)),
        Some(v) => Ok(v),
      }
    };

    let base_url = required(ENV_BASE_URL)?;
    let project = required(ENV_PROJECT)?;
    let board = required(ENV_BOARD)?;
    let username = required(ENV_USERNAME)?;
    let credential = Credential::from_base64(&required(ENV_PASSWORD)?)?;

    let timeout = match lookup(ENV_TIMEOUT_SECS) {
      None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
      Some(raw) => raw
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| ConfigError::Invalid {
          var: ENV_TIMEOUT_SECS,
          value: raw.clone(),
        })?,
    };

    Ok(Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      project,
      board,
      username,
      credential,
      timeout,
    })
  }
}
