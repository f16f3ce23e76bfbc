//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings so that lexical
//! order equals chronological order. Statuses are stored as their canonical
//! labels. UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use redress_core::{
  ComplaintStatus,
  complaint::{Complaint, StatusChange},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ComplaintStatus ──────────────────────────────────────────────────────────

pub fn encode_status(status: ComplaintStatus) -> &'static str { status.as_str() }

/// Rows written by older tooling may carry non-canonical spellings, so the
/// stored value is normalized rather than matched exactly.
pub fn decode_status(s: &str) -> Result<ComplaintStatus> {
  ComplaintStatus::parse(s).ok_or_else(|| Error::UnknownStatus(s.to_owned()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`read_complaint`].
pub const COMPLAINT_COLUMNS: &str = "complaint_id, title, description, \
                                     category, department, status, \
                                     submitted_by, assigned_to, \
                                     recipient_role, recipient_id, \
                                     submitted_to, is_deleted, created_at, \
                                     updated_at";

/// Raw values read directly from a `complaints` row.
pub struct RawComplaint {
  pub complaint_id:   String,
  pub title:          String,
  pub description:    String,
  pub category:       Option<String>,
  pub department:     String,
  pub status:         String,
  pub submitted_by:   String,
  pub assigned_to:    Option<String>,
  pub recipient_role: Option<String>,
  pub recipient_id:   Option<String>,
  pub submitted_to:   Option<String>,
  pub is_deleted:     bool,
  pub created_at:     String,
  pub updated_at:     String,
}

/// Row mapper for a `SELECT` of [`COMPLAINT_COLUMNS`].
pub fn read_complaint(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawComplaint> {
  Ok(RawComplaint {
    complaint_id:   row.get(0)?,
    title:          row.get(1)?,
    description:    row.get(2)?,
    category:       row.get(3)?,
    department:     row.get(4)?,
    status:         row.get(5)?,
    submitted_by:   row.get(6)?,
    assigned_to:    row.get(7)?,
    recipient_role: row.get(8)?,
    recipient_id:   row.get(9)?,
    submitted_to:   row.get(10)?,
    is_deleted:     row.get(11)?,
    created_at:     row.get(12)?,
    updated_at:     row.get(13)?,
  })
}

impl RawComplaint {
  pub fn into_complaint(self) -> Result<Complaint> {
    Ok(Complaint {
      complaint_id:   decode_uuid(&self.complaint_id)?,
      title:          self.title,
      description:    self.description,
      category:       self.category,
      department:     self.department,
      status:         decode_status(&self.status)?,
      submitted_by:   self.submitted_by,
      assigned_to:    self.assigned_to,
      recipient_role: self.recipient_role,
      recipient_id:   self.recipient_id,
      submitted_to:   self.submitted_to,
      is_deleted:     self.is_deleted,
      created_at:     decode_dt(&self.created_at)?,
      updated_at:     decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `status_changes` row.
pub struct RawStatusChange {
  pub change_id:    String,
  pub complaint_id: String,
  pub from_status:  String,
  pub to_status:    String,
  pub changed_by:   String,
  pub recorded_at:  String,
}

impl RawStatusChange {
  pub fn into_change(self) -> Result<StatusChange> {
    Ok(StatusChange {
      change_id:    decode_uuid(&self.change_id)?,
      complaint_id: decode_uuid(&self.complaint_id)?,
      from:         decode_status(&self.from_status)?,
      to:           decode_status(&self.to_status)?,
      changed_by:   self.changed_by,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}
