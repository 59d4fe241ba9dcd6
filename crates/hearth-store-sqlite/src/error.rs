//! Error type for `hearth-store-sqlite`.

use hearth_core::job::{JobStatus, ServiceCategory, ServiceType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] hearth_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Attempted to mutate or accept a job that was not found.
  #[error("job not found: {0}")]
  JobNotFound(uuid::Uuid),

  /// Caller is neither the job's client nor its bound provider, as the
  /// operation requires.
  #[error("access denied")]
  AccessDenied,

  #[error("invalid service selection: {category} does not offer {service_type}")]
  InvalidSelection {
    category:     ServiceCategory,
    service_type: ServiceType,
  },

  #[error("invalid status value: {0}")]
  InvalidStatus(JobStatus),

  #[error("job {0} is no longer pending")]
  NotPending(uuid::Uuid),

  #[error("job {0} cannot move from {1} to {2}")]
  InvalidTransition(uuid::Uuid, JobStatus, JobStatus),
}

/// Fold into the domain taxonomy: domain variants pass through, backend
/// failures collapse into `Storage` (surfaced as 500s with no retry).
impl From<Error> for hearth_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(inner) => inner,
      Error::JobNotFound(id) => Self::JobNotFound(id),
      Error::AccessDenied => Self::AccessDenied,
      Error::InvalidSelection { category, service_type } => {
        Self::InvalidSelection { category, service_type }
      }
      Error::InvalidStatus(status) => Self::InvalidStatus(status),
      Error::NotPending(id) => Self::NotPending(id),
      Error::InvalidTransition(id, from, to) => {
        Self::InvalidTransition(id, from, to)
      }
      Error::Database(_) | Error::Json(_) | Error::Uuid(_)
      | Error::DateParse(_) => Self::Storage(e.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
