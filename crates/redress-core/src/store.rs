//! The `ComplaintStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `redress-store-sqlite`).
//! Higher layers (`redress-api`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  complaint::{Complaint, NewComplaint, StatusChange},
  predicate::Predicate,
  status::ComplaintStatus,
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`ComplaintStore::query`].
#[derive(Debug, Clone, Default)]
pub struct ComplaintQuery {
  /// Visibility or filter predicate, typically from
  /// [`crate::scope::build_scope_filter`]. `None` matches everything.
  pub predicate: Option<Predicate>,
  pub status:    Option<ComplaintStatus>,
  /// Defaults to [`ComplaintQuery::DEFAULT_LIMIT`].
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
}

impl ComplaintQuery {
  pub const DEFAULT_LIMIT: usize = 100;
  pub const MAX_LIMIT: usize = 1000;

  pub fn matching(predicate: Predicate) -> Self {
    Self { predicate: Some(predicate), ..Self::default() }
  }

  /// The page size to apply: [`Self::DEFAULT_LIMIT`] when unset, capped at
  /// [`Self::MAX_LIMIT`].
  pub fn effective_limit(&self) -> i64 {
    let limit = self.limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT);
    i64::try_from(limit).unwrap_or(i64::MAX)
  }

  /// The number of rows to skip, saturating at `i64::MAX`.
  pub fn effective_offset(&self) -> i64 {
    i64::try_from(self.offset.unwrap_or(0)).unwrap_or(i64::MAX)
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a complaint store backend.
///
/// The store persists whatever it is given: status changes must already have
/// been checked against the workflow (see [`crate::workflow`]). Each status
/// change is recorded in an append-only history.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait ComplaintStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a new complaint in the `Pending` status.
  fn create_complaint(
    &self,
    input: NewComplaint,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  /// Retrieve a complaint by UUID, including soft-deleted ones. Returns
  /// `None` if not found.
  fn get_complaint(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Complaint>, Self::Error>> + Send + '_;

  /// Return complaints matching `query`, newest first.
  fn query<'a>(
    &'a self,
    query: &'a ComplaintQuery,
  ) -> impl Future<Output = Result<Vec<Complaint>, Self::Error>> + Send + 'a;

  /// Move a complaint from `from` to `to` and record the change.
  ///
  /// The write is conditional on the stored status still being `from`, so a
  /// transition validated against a stale read is never persisted. Fails
  /// with [`crate::Error::StaleStatus`] when the stored status moved on,
  /// [`crate::Error::StatusTransitionDenied`] when `from -> to` is not in the
  /// transition table, and [`crate::Error::ComplaintNotFound`] when there is
  /// no such complaint.
  fn set_status(
    &self,
    id: Uuid,
    from: ComplaintStatus,
    to: ComplaintStatus,
    changed_by: String,
  ) -> impl Future<Output = Result<(Complaint, StatusChange), Self::Error>>
  + Send
  + '_;

  /// Assign a complaint to a staff member. Does not change its status.
  fn assign(
    &self,
    id: Uuid,
    assignee: String,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  /// Mark a complaint as deleted. It stays readable by id.
  fn soft_delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Complaint, Self::Error>> + Send + '_;

  /// Status history for a complaint, oldest first.
  fn status_history(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Vec<StatusChange>, Self::Error>> + Send + '_;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn limit_defaults_and_is_capped() {
    assert_eq!(
      ComplaintQuery::default().effective_limit(),
      ComplaintQuery::DEFAULT_LIMIT as i64
    );
    let q = ComplaintQuery { limit: Some(5), ..ComplaintQuery::default() };
    assert_eq!(q.effective_limit(), 5);
    let q = ComplaintQuery { limit: Some(usize::MAX), ..ComplaintQuery::default() };
    assert_eq!(q.effective_limit(), ComplaintQuery::MAX_LIMIT as i64);
  }

  #[test]
  fn huge_offset_saturates_instead_of_wrapping() {
    let q = ComplaintQuery { offset: Some(usize::MAX), ..ComplaintQuery::default() };
    assert_eq!(q.effective_offset(), i64::MAX);
    assert_eq!(ComplaintQuery::default().effective_offset(), 0);
  }
}
