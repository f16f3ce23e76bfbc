//! Complaint records and their status history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  predicate::{Field, FieldSource, FieldValue},
  status::ComplaintStatus,
};

// ─── Complaint ───────────────────────────────────────────────────────────────

/// A submitted grievance as persisted by a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complaint {
  pub complaint_id:   Uuid,
  pub title:          String,
  pub description:    String,
  pub category:       Option<String>,
  pub department:     String,
  pub status:         ComplaintStatus,
  /// Identity of the student who filed the complaint.
  pub submitted_by:   String,
  pub assigned_to:    Option<String>,
  /// Role the complaint is addressed to, e.g. `"hod"`.
  pub recipient_role: Option<String>,
  pub recipient_id:   Option<String>,
  /// Free-text routing target, e.g. `"Dean office"`.
  pub submitted_to:   Option<String>,
  pub is_deleted:     bool,
  pub created_at:     DateTime<Utc>,
  pub updated_at:     DateTime<Utc>,
}

impl FieldSource for Complaint {
  fn field(&self, field: Field) -> Option<FieldValue<'_>> {
    match field {
      Field::Department => Some(FieldValue::Str(&self.department)),
      Field::AssignedTo => text(&self.assigned_to),
      Field::RecipientRole => text(&self.recipient_role),
      Field::RecipientId => text(&self.recipient_id),
      Field::SubmittedTo => text(&self.submitted_to),
      Field::IsDeleted => Some(FieldValue::Bool(self.is_deleted)),
    }
  }
}

fn text(value: &Option<String>) -> Option<FieldValue<'_>> {
  value.as_deref().map(FieldValue::Str)
}

// ─── NewComplaint ────────────────────────────────────────────────────────────

/// Input to [`crate::store::ComplaintStore::create_complaint`].
/// Status and timestamps are always set by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComplaint {
  pub title:          String,
  pub description:    String,
  #[serde(default)]
  pub category:       Option<String>,
  pub department:     String,
  pub submitted_by:   String,
  #[serde(default)]
  pub recipient_role: Option<String>,
  #[serde(default)]
  pub recipient_id:   Option<String>,
  #[serde(default)]
  pub submitted_to:   Option<String>,
}

impl NewComplaint {
  /// Convenience constructor with all routing fields unset.
  pub fn new(
    title: impl Into<String>,
    description: impl Into<String>,
    department: impl Into<String>,
    submitted_by: impl Into<String>,
  ) -> Self {
    Self {
      title:          title.into(),
      description:    description.into(),
      category:       None,
      department:     department.into(),
      submitted_by:   submitted_by.into(),
      recipient_role: None,
      recipient_id:   None,
      submitted_to:   None,
    }
  }
}

// ─── History ─────────────────────────────────────────────────────────────────

/// One recorded status change. History entries are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
  pub change_id:    Uuid,
  pub complaint_id: Uuid,
  pub from:         ComplaintStatus,
  pub to:           ComplaintStatus,
  pub changed_by:   String,
  pub recorded_at:  DateTime<Utc>,
}
