//! JSON REST API for Redress.
//!
//! Exposes an axum [`Router`] backed by any
//! [`redress_core::store::ComplaintStore`]. Authentication is the gateway's
//! job; handlers trust the principal headers (see [`principal`]).
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", redress_api::api_router(store.clone()))
//! ```

pub mod complaints;
pub mod error;
pub mod principal;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use redress_core::store::ComplaintStore;

pub use error::ApiError;
pub use principal::Principal;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: ComplaintStore + 'static,
{
  Router::new()
    .route(
      "/complaints",
      get(complaints::list::<S>).post(complaints::create::<S>),
    )
    .route(
      "/complaints/{id}",
      get(complaints::get_one::<S>).delete(complaints::delete_one::<S>),
    )
    .route("/complaints/{id}/status", post(complaints::update_status::<S>))
    .route("/complaints/{id}/approve", post(complaints::approve::<S>))
    .route("/complaints/{id}/assign", post(complaints::assign::<S>))
    .route("/complaints/{id}/history", get(complaints::history::<S>))
    .with_state(store)
}
