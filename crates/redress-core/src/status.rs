//! Complaint lifecycle statuses and their string normalization.
//!
//! Statuses arrive from forms, query strings and older records in many
//! spellings ("in-progress", "IN_PROGRESS", "In Progress"). Everything is
//! funnelled through [`normalize_status`] before it is compared or used as a
//! transition endpoint.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter};

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle stage of a complaint. New complaints always start as
/// [`ComplaintStatus::Pending`].
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  AsRefStr,
  EnumIter,
)]
pub enum ComplaintStatus {
  Pending,
  Accepted,
  Assigned,
  #[serde(rename = "In Progress")]
  #[strum(serialize = "In Progress")]
  InProgress,
  Resolved,
  Closed,
}

impl ComplaintStatus {
  /// Every status, in lifecycle order.
  pub const ALL: [ComplaintStatus; 6] = [
    Self::Pending,
    Self::Accepted,
    Self::Assigned,
    Self::InProgress,
    Self::Resolved,
    Self::Closed,
  ];

  /// The canonical, exact-cased label.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Pending => "Pending",
      Self::Accepted => "Accepted",
      Self::Assigned => "Assigned",
      Self::InProgress => "In Progress",
      Self::Resolved => "Resolved",
      Self::Closed => "Closed",
    }
  }

  /// Resolve any accepted spelling of a status. Returns `None` for strings
  /// that match no synonym.
  pub fn parse(value: &str) -> Option<Self> {
    let folded = value.trim().to_lowercase();
    SYNONYMS
      .iter()
      .find(|synonym| synonym.matches(&folded))
      .map(|synonym| synonym.status)
  }
}

// ─── Synonyms ────────────────────────────────────────────────────────────────

/// An anchored, case-insensitive pattern: the words must appear in order,
/// separated by any run (possibly empty) of spaces, hyphens or underscores.
struct Synonym {
  words:  &'static [&'static str],
  status: ComplaintStatus,
}

impl Synonym {
  fn matches(&self, folded: &str) -> bool {
    let mut rest = folded;
    for (i, word) in self.words.iter().enumerate() {
      if i > 0 {
        rest = rest.trim_start_matches(is_separator);
      }
      match rest.strip_prefix(word) {
        Some(tail) => rest = tail,
        None => return false,
      }
    }
    rest.is_empty()
  }
}

fn is_separator(c: char) -> bool { c == '-' || c == '_' || c.is_whitespace() }

/// Evaluated in order; the first match wins.
const SYNONYMS: &[Synonym] = &[
  Synonym { words: &["pending"], status: ComplaintStatus::Pending },
  Synonym { words: &["accepted"], status: ComplaintStatus::Accepted },
  Synonym { words: &["assigned"], status: ComplaintStatus::Assigned },
  Synonym { words: &["in", "progress"], status: ComplaintStatus::InProgress },
  Synonym { words: &["resolved"], status: ComplaintStatus::Resolved },
  Synonym { words: &["closed"], status: ComplaintStatus::Closed },
];

/// Normalize a status string to its canonical form.
///
/// Unrecognized values are passed through untouched rather than rejected, so
/// a typo survives normalization. Callers that need a guaranteed status
/// should use [`ComplaintStatus::parse`].
pub fn normalize_status(value: &str) -> String {
  match ComplaintStatus::parse(value) {
    Some(status) => status.as_str().to_owned(),
    None => value.to_owned(),
  }
}
