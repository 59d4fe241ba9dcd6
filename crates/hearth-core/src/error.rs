//! Error types for `hearth-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::job::{JobStatus, ServiceCategory, ServiceType};

#[derive(Debug, Error)]
pub enum Error {
  #[error("job not found: {0}")]
  JobNotFound(Uuid),

  #[error("access denied: insufficient role")]
  Forbidden,

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
  NotPending(Uuid),

  #[error("job {0} cannot move from {1} to {2}")]
  InvalidTransition(Uuid, JobStatus, JobStatus),

  #[error("storage error: {0}")]
  Storage(String),
}

// Lets infallible store backends satisfy the `Into<Error>` bound on
// `MarketStore::Error`.
impl From<std::convert::Infallible> for Error {
  fn from(never: std::convert::Infallible) -> Self { match never {} }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
