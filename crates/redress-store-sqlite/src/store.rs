//! [`SqliteStore`], the SQLite implementation of [`ComplaintStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use rusqlite::{OptionalExtension as _, types::Value as SqlValue};
use uuid::Uuid;

use redress_core::{
  ComplaintStatus, Error as CoreError,
  complaint::{Complaint, NewComplaint, StatusChange},
  store::{ComplaintQuery, ComplaintStore},
};

use crate::{
  Error, Result,
  encode::{
    COMPLAINT_COLUMNS, RawComplaint, RawStatusChange, decode_status, encode_dt,
    encode_status, encode_uuid, read_complaint,
  },
  functions,
  schema::SCHEMA,
  sql::translate,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Redress complaint store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        functions::register(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-column `UPDATE` on a complaint and return the updated row.
  ///
  /// `assignment` is a `column = ?1` fragment; `?2` is bound to the
  /// complaint id and `?3` to the new `updated_at`.
  async fn update_one(
    &self,
    id: Uuid,
    assignment: &'static str,
    value: SqlValue,
  ) -> Result<Complaint> {
    let id_str = encode_uuid(id);
    let now_str = encode_dt(Utc::now());

    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          &format!(
            "UPDATE complaints SET {assignment}, updated_at = ?3 WHERE complaint_id = ?2"
          ),
          rusqlite::params![value, id_str, now_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        let raw = tx.query_row(
          &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"),
          rusqlite::params![id_str],
          read_complaint,
        )?;
        tx.commit()?;
        Ok(Some(raw))
      })
      .await?;

    raw
      .ok_or(CoreError::ComplaintNotFound(id))?
      .into_complaint()
  }
}

/// Outcome of the conditional status `UPDATE`.
enum StatusWrite {
  Written(RawComplaint),
  Missing,
  /// The stored status did not match the expected one.
  Stale(String),
}

// ─── ComplaintStore impl ─────────────────────────────────────────────────────

impl ComplaintStore for SqliteStore {
  type Error = Error;

  async fn create_complaint(&self, input: NewComplaint) -> Result<Complaint> {
    // Truncated to the stored precision so the returned value equals a read.
    let now = Utc::now().trunc_subsecs(6);
    let complaint = Complaint {
      complaint_id:   Uuid::new_v4(),
      title:          input.title,
      description:    input.description,
      category:       input.category,
      department:     input.department,
      status:         ComplaintStatus::Pending,
      submitted_by:   input.submitted_by,
      assigned_to:    None,
      recipient_role: input.recipient_role,
      recipient_id:   input.recipient_id,
      submitted_to:   input.submitted_to,
      is_deleted:     false,
      created_at:     now,
      updated_at:     now,
    };

    let id_str      = encode_uuid(complaint.complaint_id);
    let status_str  = encode_status(complaint.status);
    let at_str      = encode_dt(now);
    let row         = complaint.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO complaints (
             complaint_id, title, description, category, department, status,
             submitted_by, assigned_to, recipient_role, recipient_id,
             submitted_to, is_deleted, created_at, updated_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9, ?10, 0, ?11, ?11)",
          rusqlite::params![
            id_str,
            row.title,
            row.description,
            row.category,
            row.department,
            status_str,
            row.submitted_by,
            row.recipient_role,
            row.recipient_id,
            row.submitted_to,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(complaint)
  }

  async fn get_complaint(&self, id: Uuid) -> Result<Option<Complaint>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawComplaint> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"),
            rusqlite::params![id_str],
            read_complaint,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawComplaint::into_complaint).transpose()
  }

  async fn query(&self, query: &ComplaintQuery) -> Result<Vec<Complaint>> {
    let mut conds: Vec<String> = vec![];
    let mut params: Vec<SqlValue> = vec![];

    if let Some(predicate) = &query.predicate {
      let filter = translate(predicate);
      conds.push(filter.clause);
      params.extend(filter.params);
    }
    if let Some(status) = query.status {
      conds.push("status = ?".to_owned());
      params.push(SqlValue::Text(encode_status(status).to_owned()));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    params.push(SqlValue::Integer(query.effective_limit()));
    params.push(SqlValue::Integer(query.effective_offset()));

    let sql = format!(
      "SELECT {COMPLAINT_COLUMNS}
       FROM complaints
       {where_clause}
       ORDER BY created_at DESC, rowid DESC
       LIMIT ? OFFSET ?"
    );

    let raws: Vec<RawComplaint> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), read_complaint)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawComplaint::into_complaint).collect()
  }

  async fn set_status(
    &self,
    id:         Uuid,
    from:       ComplaintStatus,
    to:         ComplaintStatus,
    changed_by: String,
  ) -> Result<(Complaint, StatusChange)> {
    if !from.can_transition_to(to) {
      return Err(
        CoreError::StatusTransitionDenied {
          from:    from.to_string(),
          to:      to.to_string(),
          allowed: from.allowed_targets().iter().map(|s| s.to_string()).collect(),
        }
        .into(),
      );
    }

    let change_id = Uuid::new_v4();
    let now       = Utc::now().trunc_subsecs(6);

    let id_str     = encode_uuid(id);
    let change_str = encode_uuid(change_id);
    let from_str   = encode_status(from);
    let to_str     = encode_status(to);
    let at_str     = encode_dt(now);
    let actor      = changed_by.clone();

    let write: StatusWrite = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE complaints SET status = ?1, updated_at = ?2
           WHERE complaint_id = ?3 AND status = ?4",
          rusqlite::params![to_str, at_str, id_str, from_str],
        )?;
        if changed == 0 {
          let stored: Option<String> = tx
            .query_row(
              "SELECT status FROM complaints WHERE complaint_id = ?1",
              rusqlite::params![id_str],
              |r| r.get(0),
            )
            .optional()?;
          return Ok(match stored {
            Some(actual) => StatusWrite::Stale(actual),
            None => StatusWrite::Missing,
          });
        }

        tx.execute(
          "INSERT INTO status_changes
             (change_id, complaint_id, from_status, to_status, changed_by, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![change_str, id_str, from_str, to_str, actor, at_str],
        )?;
        let raw = tx.query_row(
          &format!("SELECT {COMPLAINT_COLUMNS} FROM complaints WHERE complaint_id = ?1"),
          rusqlite::params![id_str],
          read_complaint,
        )?;
        tx.commit()?;
        Ok(StatusWrite::Written(raw))
      })
      .await?;

    let raw = match write {
      StatusWrite::Written(raw) => raw,
      StatusWrite::Missing => return Err(CoreError::ComplaintNotFound(id).into()),
      StatusWrite::Stale(actual) => {
        return Err(
          CoreError::StaleStatus { expected: from, actual: decode_status(&actual)? }
            .into(),
        );
      }
    };

    let change = StatusChange {
      change_id,
      complaint_id: id,
      from,
      to,
      changed_by,
      recorded_at: now,
    };
    Ok((raw.into_complaint()?, change))
  }

  async fn assign(&self, id: Uuid, assignee: String) -> Result<Complaint> {
    self
      .update_one(id, "assigned_to = ?1", SqlValue::Text(assignee))
      .await
  }

  async fn soft_delete(&self, id: Uuid) -> Result<Complaint> {
    self
      .update_one(id, "is_deleted = ?1", SqlValue::Integer(1))
      .await
  }

  async fn status_history(&self, id: Uuid) -> Result<Vec<StatusChange>> {
    let id_str = encode_uuid(id);

    let raws: Vec<RawStatusChange> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT change_id, complaint_id, from_status, to_status, changed_by, recorded_at
           FROM status_changes
           WHERE complaint_id = ?1
           ORDER BY recorded_at ASC, rowid ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawStatusChange {
              change_id:    row.get(0)?,
              complaint_id: row.get(1)?,
              from_status:  row.get(2)?,
              to_status:    row.get(3)?,
              changed_by:   row.get(4)?,
              recorded_at:  row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStatusChange::into_change).collect()
  }
}
