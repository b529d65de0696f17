//! Error type for `latch-provider-http`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid provider configuration: {0}")]
  InvalidConfig(String),

  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("identity provider responded with status {0}")]
  Status(u16),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
