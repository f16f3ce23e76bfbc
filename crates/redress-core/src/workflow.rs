//! The complaint status workflow.
//!
//! ```text
//! Pending      -> Accepted | In Progress | Closed
//! Accepted     -> In Progress | Closed
//! Assigned     -> In Progress | Closed
//! In Progress  -> Resolved | Closed
//! Resolved     -> Closed
//! Closed       -> Accepted            (reopen)
//! ```
//!
//! Every function here is a pure function of its arguments. String inputs are
//! normalized with [`normalize_status`] before lookup, so callers can pass raw
//! request values straight through.

use crate::{
  Error, Result,
  role::Role,
  status::{ComplaintStatus, normalize_status},
};

use ComplaintStatus::{Accepted, Assigned, Closed, InProgress, Pending, Resolved};

// ─── Transition table ────────────────────────────────────────────────────────

/// Legal direct transitions, one entry per status.
pub static TRANSITION_TABLE: [(ComplaintStatus, &[ComplaintStatus]); 6] = [
  (Pending, &[Accepted, InProgress, Closed]),
  (Accepted, &[InProgress, Closed]),
  (Assigned, &[InProgress, Closed]),
  (InProgress, &[Resolved, Closed]),
  (Resolved, &[Closed]),
  (Closed, &[Accepted]),
];

impl ComplaintStatus {
  /// Statuses directly reachable from `self`.
  pub fn allowed_targets(&self) -> &'static [ComplaintStatus] {
    TRANSITION_TABLE
      .iter()
      .find(|(from, _)| from == self)
      .map(|(_, targets)| *targets)
      .unwrap_or(&[])
  }

  pub fn can_transition_to(&self, to: ComplaintStatus) -> bool {
    self.allowed_targets().contains(&to)
  }

  /// True iff the complaint is currently closed.
  ///
  /// This does not mean "no further transitions": `Closed -> Accepted`
  /// reopens a complaint.
  pub fn is_terminal(&self) -> bool { matches!(self, Closed) }
}

// ─── String-level operations ─────────────────────────────────────────────────

/// Whether `from -> to` is a legal direct transition. Unknown statuses on
/// either side yield `false`.
pub fn can_transition(from: &str, to: &str) -> bool {
  match (ComplaintStatus::parse(from), ComplaintStatus::parse(to)) {
    (Some(from), Some(to)) => from.can_transition_to(to),
    _ => false,
  }
}

/// Fail with [`Error::StatusTransitionDenied`] unless `from -> to` is legal.
pub fn assert_transition(from: &str, to: &str) -> Result<()> {
  if can_transition(from, to) {
    return Ok(());
  }
  let allowed = ComplaintStatus::parse(from)
    .map(|status| {
      status
        .allowed_targets()
        .iter()
        .map(|target| target.as_str().to_owned())
        .collect()
    })
    .unwrap_or_default();
  Err(Error::StatusTransitionDenied {
    from: normalize_status(from),
    to: normalize_status(to),
    allowed,
  })
}

/// The status a complaint moves to when approved by `approver_role`.
///
/// A head of department sends it straight to `In Progress`; every other role
/// accepts it. The derived target must still be legal from `current`.
pub fn derive_status_on_approval(
  current: &str,
  approver_role: &str,
) -> Result<ComplaintStatus> {
  let target = if Role::parse(approver_role).is_hod() {
    InProgress
  } else {
    Accepted
  };
  assert_transition(current, target.as_str())?;
  Ok(target)
}

/// Coerce an untrusted requested status. Returns the normalized `desired`
/// status when it is reachable from `current`, otherwise `current` as given.
///
/// Never fails. A returned value equal to `current` means the request was
/// ignored.
pub fn sanitize_incoming_status(desired: &str, current: &str) -> String {
  let desired = normalize_status(desired);
  if can_transition(current, &desired) {
    desired
  } else {
    current.to_owned()
  }
}

/// True iff `status` normalizes to `Closed`. See
/// [`ComplaintStatus::is_terminal`].
pub fn is_terminal(status: &str) -> bool {
  ComplaintStatus::parse(status).is_some_and(|s| s.is_terminal())
}
