//! Translation of [`Predicate`] trees into parameterized SQLite fragments.
//!
//! Every fragment evaluates to 0 or 1, never NULL, so `NOT` behaves like the
//! in-memory evaluator even on absent columns:
//!
//! | Node | SQL |
//! |------|-----|
//! | `Eq` | `(col IS ?)` |
//! | `Matches` | `regexp(?, col)`, with `(?i)` prepended when case-insensitive |
//! | `In` | `COALESCE(col IN (?, …), 0)`; `0` for an empty list |
//! | `IsNull` | `(col IS NULL)` |

use redress_core::predicate::{Field, Predicate, Value};
use rusqlite::types::Value as SqlValue;

/// A `WHERE`-ready clause and its positional (`?`) parameters, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFilter {
  pub clause: String,
  pub params: Vec<SqlValue>,
}

/// The `complaints` column backing `field`.
pub fn column(field: Field) -> &'static str {
  match field {
    Field::Department => "department",
    Field::AssignedTo => "assigned_to",
    Field::RecipientRole => "recipient_role",
    Field::RecipientId => "recipient_id",
    Field::SubmittedTo => "submitted_to",
    Field::IsDeleted => "is_deleted",
  }
}

pub fn translate(predicate: &Predicate) -> SqlFilter {
  let mut params = Vec::new();
  let clause = write(predicate, &mut params);
  SqlFilter { clause, params }
}

fn write(predicate: &Predicate, params: &mut Vec<SqlValue>) -> String {
  match predicate {
    Predicate::And { all } => join(all, " AND ", "1", params),
    Predicate::Or { any } => join(any, " OR ", "0", params),
    Predicate::Not { not } => format!("(NOT {})", write(not, params)),
    Predicate::Eq { field, value } => {
      params.push(match value {
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Str(s) => SqlValue::Text(s.clone()),
      });
      format!("({} IS ?)", column(*field))
    }
    Predicate::Matches { field, pattern, case_insensitive } => {
      let pattern = if *case_insensitive {
        format!("(?i){pattern}")
      } else {
        pattern.clone()
      };
      params.push(SqlValue::Text(pattern));
      format!("regexp(?, {})", column(*field))
    }
    Predicate::In { field, values } => {
      if values.is_empty() {
        return "0".to_owned();
      }
      params.extend(values.iter().cloned().map(SqlValue::Text));
      let marks = vec!["?"; values.len()].join(", ");
      format!("COALESCE({} IN ({marks}), 0)", column(*field))
    }
    Predicate::IsNull { field } => format!("({} IS NULL)", column(*field)),
  }
}

fn join(
  children: &[Predicate],
  separator: &str,
  empty: &str,
  params: &mut Vec<SqlValue>,
) -> String {
  if children.is_empty() {
    return empty.to_owned();
  }
  let parts: Vec<String> =
    children.iter().map(|child| write(child, params)).collect();
  format!("({})", parts.join(separator))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn leaves() {
    let f = translate(&Predicate::equals(Field::IsDeleted, true));
    assert_eq!(f.clause, "(is_deleted IS ?)");
    assert_eq!(f.params, vec![SqlValue::Integer(1)]);

    let f = translate(&Predicate::matches_ci(Field::SubmittedTo, "admin|dean"));
    assert_eq!(f.clause, "regexp(?, submitted_to)");
    assert_eq!(f.params, vec![SqlValue::Text("(?i)admin|dean".into())]);

    let f = translate(&Predicate::is_null(Field::SubmittedTo));
    assert_eq!(f.clause, "(submitted_to IS NULL)");
    assert!(f.params.is_empty());
  }

  #[test]
  fn set_membership() {
    let f = translate(&Predicate::one_of(
      Field::AssignedTo,
      vec!["a".into(), "b".into()],
    ));
    assert_eq!(f.clause, "COALESCE(assigned_to IN (?, ?), 0)");
    assert_eq!(f.params.len(), 2);

    let f = translate(&Predicate::one_of(Field::AssignedTo, vec![]));
    assert_eq!(f.clause, "0");
  }

  #[test]
  fn groups_keep_parameter_order() {
    let f = translate(&Predicate::and(vec![
      Predicate::negate(Predicate::equals(Field::IsDeleted, true)),
      Predicate::or(vec![
        Predicate::equals(Field::AssignedTo, "u1"),
        Predicate::equals(Field::RecipientId, "u2"),
      ]),
      Predicate::or(vec![]),
    ]));
    assert_eq!(
      f.clause,
      "((NOT (is_deleted IS ?)) AND ((assigned_to IS ?) OR (recipient_id IS ?)) AND 0)"
    );
    assert_eq!(f.params, vec![
      SqlValue::Integer(1),
      SqlValue::Text("u1".into()),
      SqlValue::Text("u2".into()),
    ]);
  }

  #[test]
  fn empty_and_is_true() {
    assert_eq!(translate(&Predicate::and(vec![])).clause, "1");
  }
}
