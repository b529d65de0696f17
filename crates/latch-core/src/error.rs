//! Error types for `latch-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("principal id must not be empty")]
  EmptyPrincipalId,

  #[error("unknown role: {0:?}")]
  UnknownRole(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
