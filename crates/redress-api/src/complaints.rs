//! Handlers for `/complaints` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/complaints` | Department-scoped listing; `?staff_ids=a,b&strict_recipient=true&status=...` |
//! | `POST` | `/complaints` | Body: [`CreateBody`]; returns 201 + stored complaint |
//! | `GET`  | `/complaints/:id` | 404 if not found |
//! | `DELETE` | `/complaints/:id` | Soft delete |
//! | `POST` | `/complaints/:id/status` | Body: [`StatusBody`]; 409 on a denied strict transition |
//! | `POST` | `/complaints/:id/approve` | Target status derived from the principal's role |
//! | `POST` | `/complaints/:id/assign` | Body: `{"assigned_to":"..."}` |
//! | `GET`  | `/complaints/:id/history` | Status changes, oldest first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use redress_core::{
  ComplaintStatus,
  complaint::{Complaint, NewComplaint, StatusChange},
  normalize_status,
  scope::{ScopeOptions, build_scope_filter},
  store::{ComplaintQuery, ComplaintStore},
  workflow::{assert_transition, derive_status_on_approval, sanitize_incoming_status},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::ApiError, principal::Principal};

/// Load a complaint or fail with 404.
async fn load<S>(store: &S, id: Uuid) -> Result<Complaint, ApiError>
where
  S: ComplaintStore,
{
  store
    .get_complaint(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("complaint {id} not found")))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Comma-separated identities of staff reporting to the principal.
  pub staff_ids:        Option<String>,
  #[serde(default)]
  pub strict_recipient: bool,
  /// Any accepted spelling of a status.
  pub status:           Option<String>,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

/// `GET /complaints[?staff_ids=...][&strict_recipient=true][&status=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Complaint>>, ApiError>
where
  S: ComplaintStore,
{
  let status = params
    .status
    .as_deref()
    .map(|s| {
      ComplaintStatus::parse(s)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown status {s:?}")))
    })
    .transpose()?;

  let options = ScopeOptions {
    staff_ids:        params
      .staff_ids
      .map(|s| s.split(',').map(|t| t.trim().to_owned()).collect())
      .unwrap_or_default(),
    strict_recipient: params.strict_recipient,
  };
  let predicate = build_scope_filter(&principal.scoped_user(), &options)?;
  tracing::debug!(user = %principal.user_id, ?predicate, "built scope filter");

  let query = ComplaintQuery {
    predicate: Some(predicate),
    status,
    limit: params.limit,
    offset: params.offset,
  };
  let complaints = store.query(&query).await.map_err(ApiError::store)?;
  Ok(Json(complaints))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /complaints`. The submitter is the principal.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub title:          String,
  pub description:    String,
  pub category:       Option<String>,
  pub department:     String,
  pub recipient_role: Option<String>,
  pub recipient_id:   Option<String>,
  pub submitted_to:   Option<String>,
}

/// `POST /complaints`: returns 201 + the stored [`Complaint`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ComplaintStore,
{
  if body.title.trim().is_empty() {
    return Err(ApiError::BadRequest("title must not be empty".into()));
  }
  if body.department.trim().is_empty() {
    return Err(ApiError::BadRequest("department must not be empty".into()));
  }

  let input = NewComplaint {
    title:          body.title,
    description:    body.description,
    category:       body.category,
    department:     body.department.trim().to_owned(),
    submitted_by:   principal.user_id,
    recipient_role: body.recipient_role,
    recipient_id:   body.recipient_id,
    submitted_to:   body.submitted_to,
  };
  let complaint = store.create_complaint(input).await.map_err(ApiError::store)?;
  tracing::info!(complaint_id = %complaint.complaint_id, "complaint created");
  Ok((StatusCode::CREATED, Json(complaint)))
}

// ─── Get / delete ─────────────────────────────────────────────────────────────

/// `GET /complaints/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore,
{
  Ok(Json(load(store.as_ref(), id).await?))
}

/// `DELETE /complaints/:id`: soft delete; returns the updated complaint.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Path(id): Path<Uuid>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore,
{
  load(store.as_ref(), id).await?;
  let complaint = store.soft_delete(id).await.map_err(ApiError::store)?;
  tracing::info!(complaint_id = %id, actor = %principal.user_id, "complaint deleted");
  Ok(Json(complaint))
}

// ─── Status ───────────────────────────────────────────────────────────────────

fn default_strict() -> bool { true }

/// JSON body accepted by `POST /complaints/:id/status`.
#[derive(Debug, Deserialize)]
pub struct StatusBody {
  /// Any accepted spelling of the target status.
  pub status: String,
  /// Strict requests fail with 409 on an illegal transition. Lenient requests
  /// are silently ignored instead.
  #[serde(default = "default_strict")]
  pub strict: bool,
}

/// Response of the status and approval endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusUpdate {
  pub complaint: Complaint,
  /// `false` when a lenient request was ignored.
  pub applied:   bool,
}

/// `POST /complaints/:id/status`
pub async fn update_status<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Path(id): Path<Uuid>,
  Json(body): Json<StatusBody>,
) -> Result<Json<StatusUpdate>, ApiError>
where
  S: ComplaintStore,
{
  let complaint = load(store.as_ref(), id).await?;
  let current = complaint.status.as_str();

  let next = if body.strict {
    if let Err(e) = assert_transition(current, &body.status) {
      tracing::warn!(complaint_id = %id, error = %e, "status change denied");
      return Err(e.into());
    }
    normalize_status(&body.status)
  } else {
    sanitize_incoming_status(&body.status, current)
  };

  match ComplaintStatus::parse(&next) {
    Some(to) if to != complaint.status => {
      let (complaint, _) =
        apply(store.as_ref(), id, complaint.status, to, principal).await?;
      Ok(Json(StatusUpdate { complaint, applied: true }))
    }
    _ => {
      tracing::warn!(
        complaint_id = %id,
        requested = %body.status,
        current,
        "lenient status change ignored"
      );
      Ok(Json(StatusUpdate { complaint, applied: false }))
    }
  }
}

/// `POST /complaints/:id/approve`
///
/// A head of department moves the complaint to `In Progress`; any other role
/// moves it to `Accepted`.
pub async fn approve<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Path(id): Path<Uuid>,
) -> Result<Json<StatusUpdate>, ApiError>
where
  S: ComplaintStore,
{
  let complaint = load(store.as_ref(), id).await?;
  let to = derive_status_on_approval(
    complaint.status.as_str(),
    principal.role.as_str(),
  )
  .inspect_err(|e| {
    tracing::warn!(complaint_id = %id, error = %e, "approval denied");
  })?;
  let (complaint, _) =
    apply(store.as_ref(), id, complaint.status, to, principal).await?;
  Ok(Json(StatusUpdate { complaint, applied: true }))
}

/// Persist a validated `from -> to` change. The store refuses the write with
/// a 409 if another request moved the complaint off `from` in the meantime.
async fn apply<S>(
  store: &S,
  id: Uuid,
  from: ComplaintStatus,
  to: ComplaintStatus,
  principal: Principal,
) -> Result<(Complaint, StatusChange), ApiError>
where
  S: ComplaintStore,
{
  let (complaint, change) = store
    .set_status(id, from, to, principal.user_id)
    .await
    .map_err(ApiError::store)
    .inspect_err(|e| {
      if let ApiError::Conflict(reason) = e {
        tracing::warn!(complaint_id = %id, %reason, "status change lost a race");
      }
    })?;
  tracing::info!(
    complaint_id = %id,
    from = %change.from,
    to = %change.to,
    actor = %change.changed_by,
    "status changed"
  );
  Ok((complaint, change))
}

// ─── Assign ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AssignBody {
  pub assigned_to: String,
}

/// `POST /complaints/:id/assign`, body: `{"assigned_to":"..."}`
pub async fn assign<S>(
  State(store): State<Arc<S>>,
  principal: Principal,
  Path(id): Path<Uuid>,
  Json(body): Json<AssignBody>,
) -> Result<Json<Complaint>, ApiError>
where
  S: ComplaintStore,
{
  let assignee = body.assigned_to.trim();
  if assignee.is_empty() {
    return Err(ApiError::BadRequest("assigned_to must not be empty".into()));
  }
  load(store.as_ref(), id).await?;
  let complaint = store
    .assign(id, assignee.to_owned())
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    complaint_id = %id,
    assignee,
    actor = %principal.user_id,
    "complaint assigned"
  );
  Ok(Json(complaint))
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /complaints/:id/history`
pub async fn history<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<StatusChange>>, ApiError>
where
  S: ComplaintStore,
{
  load(store.as_ref(), id).await?;
  let changes = store.status_history(id).await.map_err(ApiError::store)?;
  Ok(Json(changes))
}
