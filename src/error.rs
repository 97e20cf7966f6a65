use thiserror::Error;

/// Missing or malformed startup configuration. Always fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("env variable {0} not found")]
  Missing(&'static str),

  #[error("env variable {0} cannot be empty")]
  Empty(&'static str),

  #[error("env variable {var} is not valid base64: {reason}")]
  InvalidCredential { var: &'static str, reason: String },

  #[error("env variable {var} has invalid value {value:?}")]
  Invalid { var: &'static str, value: String },
}

/// A project, board or sprint could not be pinned down to exactly one value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
  #[error("failed to get jira {what}: not found")]
  NotFound { what: String },

  #[error("failed to get jira {what}: {} candidates match ({})", .candidates.len(), .candidates.join(", "))]
  Ambiguous { what: String, candidates: Vec<String> },
}

impl ResolutionError {
  pub fn not_found(what: impl Into<String>) -> Self {
    ResolutionError::NotFound { what: what.into() }
  }

  pub fn ambiguous(what: impl Into<String>, candidates: Vec<String>) -> Self {
    ResolutionError::Ambiguous {
      what: what.into(),
      candidates,
    }
  }
}

/// Failure talking to the Jira REST API.
#[derive(Debug, Error)]
pub enum RemoteError {
  #[error("request to {url} failed: {message}")]
  Transport { url: String, message: String },

  #[error("request to {url} returned HTTP {code}")]
  Status { url: String, code: u16 },

  #[error("unexpected response from {url}: {message}")]
  Decode { url: String, message: String },
}

#[derive(Debug, Error)]
pub enum ReportError {
  #[error(transparent)]
  Resolution(#[from] ResolutionError),

  #[error("{context}: {source}")]
  Remote {
    context: String,
    #[source]
    source: RemoteError,
  },

  #[error("refusing to run an unfiltered query; pass --all with --include-resolved to list every issue")]
  EmptyPredicate,
}

/// Attach a short description of what was being fetched to a remote failure.
pub trait RemoteContext<T> {
  fn remote_context(self, context: &str) -> Result<T, ReportError>;
}

impl<T> RemoteContext<T> for Result<T, RemoteError> {
  fn remote_context(self, context: &str) -> Result<T, ReportError> {
    self.map_err(|source| ReportError::Remote {
      context: context.to_string(),
      source,
    })
  }
}
