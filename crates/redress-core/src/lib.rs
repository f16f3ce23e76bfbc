//! Core types and rules for the Redress complaint tracker.
//!
//! Two independent pieces of domain logic live here: the complaint status
//! [`workflow`] and the department [`scope`] filter. Both are pure functions.
//! The crate is free of HTTP and database dependencies; storage backends
//! implement [`store::ComplaintStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod complaint;
pub mod error;
pub mod predicate;
pub mod role;
pub mod scope;
pub mod status;
pub mod store;
pub mod workflow;

pub use error::{Error, Result};
pub use status::{ComplaintStatus, normalize_status};
