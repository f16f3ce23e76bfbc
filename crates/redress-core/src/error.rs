//! Error types for `redress-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::status::ComplaintStatus;

#[derive(Debug, Error)]
pub enum Error {
  /// The requested status change is not in the transition table.
  #[error(
    "invalid status transition from {from:?} to {to:?}; allowed: {}",
    allowed_list(.allowed)
  )]
  StatusTransitionDenied {
    from:    String,
    to:      String,
    /// Canonical targets reachable from `from`; empty when `from` is unknown.
    allowed: Vec<String>,
  },

  /// The principal handed to the scope builder is missing an identity or a
  /// department. This is a programming error in the caller.
  #[error("invalid scope user: {0}")]
  InvalidScopeUser(String),

  #[error("invalid match pattern: {0}")]
  InvalidPattern(#[from] regex::Error),

  #[error("complaint not found: {0}")]
  ComplaintNotFound(Uuid),

  /// A status write lost a race: the stored status is no longer the one the
  /// transition was checked against.
  #[error("complaint status changed concurrently: expected {expected}, found {actual}")]
  StaleStatus {
    expected: ComplaintStatus,
    actual:   ComplaintStatus,
  },
}

fn allowed_list(allowed: &[String]) -> String {
  if allowed.is_empty() {
    "(none)".to_owned()
  } else {
    allowed.join(", ")
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
