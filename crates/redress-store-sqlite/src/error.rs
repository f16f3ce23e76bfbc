//! Error type for `redress-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A domain-level failure: missing complaint, illegal or stale status
  /// change. Exposed as the error source so callers can classify it.
  #[error("{0}")]
  Core(#[source] redress_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored status string that does not normalize to a known status.
  #[error("unknown stored status: {0:?}")]
  UnknownStatus(String),
}

impl From<redress_core::Error> for Error {
  fn from(e: redress_core::Error) -> Self { Self::Core(e) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
