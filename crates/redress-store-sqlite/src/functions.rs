//! Custom SQL functions registered on every connection.

use std::sync::Arc;

use regex::Regex;
use rusqlite::{Connection, functions::FunctionFlags};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Register `regexp(pattern, text)`.
///
/// Returns false when `text` is NULL. Compiled patterns are cached per
/// statement through SQLite's auxiliary-data slot.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "regexp",
    2,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let re: Arc<Regex> =
        ctx.get_or_create_aux(0, |raw| -> Result<_, BoxError> {
          Ok(Regex::new(raw.as_str()?)?)
        })?;
      let text: Option<String> = ctx.get(1)?;
      Ok(text.is_some_and(|t| re.is_match(&t)))
    },
  )
}
