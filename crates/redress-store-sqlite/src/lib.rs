//! SQLite backend for the Redress complaint store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Visibility predicates from
//! `redress-core` are translated to SQL by [`sql::translate`].

mod encode;
mod functions;
mod schema;
mod store;

pub mod error;
pub mod sql;

pub use error::{Error, Result};
pub use store::SqliteStore;
