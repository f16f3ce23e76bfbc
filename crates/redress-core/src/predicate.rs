//! A storage-agnostic boolean predicate over complaint fields.
//!
//! Predicates are plain data. A storage backend translates them into its own
//! query language (see `redress-store-sqlite`); [`Predicate::compile`] and
//! [`CompiledPredicate::evaluate`] form the reference in-memory evaluator
//! every translation must agree with.
//!
//! # Semantics
//!
//! - `Eq`, `Matches` and `In` are false on an absent (null) field.
//! - `IsNull` is true iff the field is absent.
//! - `Not` is plain negation, so `Not(Matches)` holds on an absent field.
//! - `And([])` is true, `Or([])` is false.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::Result;

// ─── Fields and values ───────────────────────────────────────────────────────

/// The complaint fields a predicate may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
  Department,
  AssignedTo,
  RecipientRole,
  RecipientId,
  SubmittedTo,
  IsDeleted,
}

/// A scalar operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Bool(bool),
  Str(String),
}

impl From<bool> for Value {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Str(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Str(s) }
}

/// A borrowed field value produced by a [`FieldSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
  Bool(bool),
  Str(&'a str),
}

impl FieldValue<'_> {
  fn equals(&self, value: &Value) -> bool {
    match (self, value) {
      (Self::Bool(a), Value::Bool(b)) => a == b,
      (Self::Str(a), Value::Str(b)) => a == b,
      _ => false,
    }
  }

  fn as_str(&self) -> Option<&str> {
    match self {
      Self::Str(s) => Some(*s),
      Self::Bool(_) => None,
    }
  }
}

/// Anything a predicate can be evaluated against.
pub trait FieldSource {
  /// The value of `field`, or `None` when it is absent or null.
  fn field(&self, field: Field) -> Option<FieldValue<'_>>;
}

// ─── Predicate tree ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
  And {
    all: Vec<Predicate>,
  },
  Or {
    any: Vec<Predicate>,
  },
  Not {
    not: Box<Predicate>,
  },
  Eq {
    field: Field,
    value: Value,
  },
  /// Regular-expression match (unanchored unless the pattern anchors itself).
  Matches {
    field:            Field,
    pattern:          String,
    case_insensitive: bool,
  },
  In {
    field:  Field,
    values: Vec<String>,
  },
  IsNull {
    field: Field,
  },
}

impl Predicate {
  pub fn and(all: Vec<Predicate>) -> Self { Self::And { all } }

  pub fn or(any: Vec<Predicate>) -> Self { Self::Or { any } }

  pub fn negate(inner: Predicate) -> Self { Self::Not { not: Box::new(inner) } }

  pub fn equals(field: Field, value: impl Into<Value>) -> Self {
    Self::Eq { field, value: value.into() }
  }

  pub fn matches(field: Field, pattern: impl Into<String>) -> Self {
    Self::Matches { field, pattern: pattern.into(), case_insensitive: false }
  }

  pub fn matches_ci(field: Field, pattern: impl Into<String>) -> Self {
    Self::Matches { field, pattern: pattern.into(), case_insensitive: true }
  }

  pub fn one_of(field: Field, values: Vec<String>) -> Self {
    Self::In { field, values }
  }

  pub fn is_null(field: Field) -> Self { Self::IsNull { field } }

  /// Compile every `Matches` pattern once, producing a form that can be
  /// tested against many records.
  ///
  /// Fails if any pattern does not compile, even in a branch that a given
  /// record would never reach.
  pub fn compile(&self) -> Result<CompiledPredicate> {
    Ok(CompiledPredicate(Node::build(self)?))
  }

  /// Evaluate against a single record.
  ///
  /// Compiles the predicate on every call; use [`Predicate::compile`] when
  /// filtering more than one record.
  pub fn evaluate<S: FieldSource + ?Sized>(&self, source: &S) -> Result<bool> {
    Ok(self.compile()?.evaluate(source))
  }
}

// ─── Compiled form ───────────────────────────────────────────────────────────

/// A [`Predicate`] with its regular expressions compiled.
#[derive(Debug, Clone)]
pub struct CompiledPredicate(Node);

#[derive(Debug, Clone)]
enum Node {
  And(Vec<Node>),
  Or(Vec<Node>),
  Not(Box<Node>),
  Eq { field: Field, value: Value },
  Matches { field: Field, regex: Regex },
  In { field: Field, values: Vec<String> },
  IsNull { field: Field },
}

impl Node {
  fn build(predicate: &Predicate) -> Result<Self> {
    Ok(match predicate {
      Predicate::And { all } => {
        Self::And(all.iter().map(Self::build).collect::<Result<_>>()?)
      }
      Predicate::Or { any } => {
        Self::Or(any.iter().map(Self::build).collect::<Result<_>>()?)
      }
      Predicate::Not { not } => Self::Not(Box::new(Self::build(not)?)),
      Predicate::Eq { field, value } => {
        Self::Eq { field: *field, value: value.clone() }
      }
      Predicate::Matches { field, pattern, case_insensitive } => Self::Matches {
        field: *field,
        regex: RegexBuilder::new(pattern)
          .case_insensitive(*case_insensitive)
          .build()?,
      },
      Predicate::In { field, values } => {
        Self::In { field: *field, values: values.clone() }
      }
      Predicate::IsNull { field } => Self::IsNull { field: *field },
    })
  }

  fn test<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
    match self {
      Self::And(all) => all.iter().all(|n| n.test(source)),
      Self::Or(any) => any.iter().any(|n| n.test(source)),
      Self::Not(inner) => !inner.test(source),
      Self::Eq { field, value } => {
        source.field(*field).is_some_and(|v| v.equals(value))
      }
      Self::Matches { field, regex } => source
        .field(*field)
        .and_then(|v| v.as_str().map(|s| regex.is_match(s)))
        .unwrap_or(false),
      Self::In { field, values } => source
        .field(*field)
        .and_then(|v| v.as_str().map(|s| values.iter().any(|x| x == s)))
        .unwrap_or(false),
      Self::IsNull { field } => source.field(*field).is_none(),
    }
  }
}

impl CompiledPredicate {
  /// Evaluate against a single record.
  pub fn evaluate<S: FieldSource + ?Sized>(&self, source: &S) -> bool {
    self.0.test(source)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;

  #[derive(Default)]
  struct Doc(HashMap<Field, FieldValue<'static>>);

  impl Doc {
    fn with(mut self, field: Field, value: FieldValue<'static>) -> Self {
      self.0.insert(field, value);
      self
    }
  }

  impl FieldSource for Doc {
    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
      self.0.get(&field).copied()
    }
  }

  #[test]
  fn empty_groups() {
    let doc = Doc::default();
    assert!(Predicate::and(vec![]).evaluate(&doc).unwrap());
    assert!(!Predicate::or(vec![]).evaluate(&doc).unwrap());
  }

  #[test]
  fn absent_fields() {
    let doc = Doc::default();
    assert!(!Predicate::equals(Field::AssignedTo, "u1").evaluate(&doc).unwrap());
    assert!(!Predicate::matches(Field::SubmittedTo, "dean").evaluate(&doc).unwrap());
    assert!(
      Predicate::negate(Predicate::matches(Field::SubmittedTo, "dean"))
        .evaluate(&doc)
        .unwrap()
    );
    assert!(
      !Predicate::one_of(Field::AssignedTo, vec!["u1".into()])
        .evaluate(&doc)
        .unwrap()
    );
    assert!(Predicate::is_null(Field::SubmittedTo).evaluate(&doc).unwrap());
    assert!(
      Predicate::negate(Predicate::equals(Field::IsDeleted, true))
        .evaluate(&doc)
        .unwrap()
    );
  }

  #[test]
  fn typed_equality() {
    let doc = Doc::default()
      .with(Field::IsDeleted, FieldValue::Bool(true))
      .with(Field::AssignedTo, FieldValue::Str("true"));
    assert!(Predicate::equals(Field::IsDeleted, true).evaluate(&doc).unwrap());
    assert!(!Predicate::equals(Field::IsDeleted, "true").evaluate(&doc).unwrap());
    assert!(!Predicate::equals(Field::AssignedTo, true).evaluate(&doc).unwrap());
  }

  #[test]
  fn regex_case_sensitivity() {
    let doc = Doc::default().with(Field::SubmittedTo, FieldValue::Str("Dean Office"));
    assert!(!Predicate::matches(Field::SubmittedTo, "dean").evaluate(&doc).unwrap());
    assert!(Predicate::matches_ci(Field::SubmittedTo, "dean").evaluate(&doc).unwrap());
  }

  #[test]
  fn invalid_pattern_is_an_error() {
    let doc = Doc::default().with(Field::Department, FieldValue::Str("IT"));
    let result = Predicate::matches(Field::Department, "(").evaluate(&doc);
    assert!(matches!(result, Err(crate::Error::InvalidPattern(_))));
  }

  #[test]
  fn compiled_form_is_reusable_across_records() {
    let compiled = Predicate::and(vec![
      Predicate::matches_ci(Field::Department, "^it$"),
      Predicate::negate(Predicate::matches_ci(Field::SubmittedTo, "dean")),
    ])
    .compile()
    .unwrap();

    let plain = Doc::default().with(Field::Department, FieldValue::Str("IT"));
    let routed = Doc::default()
      .with(Field::Department, FieldValue::Str("it"))
      .with(Field::SubmittedTo, FieldValue::Str("Dean office"));
    let other = Doc::default().with(Field::Department, FieldValue::Str("Physics"));

    let results: Vec<bool> =
      [&plain, &routed, &other].iter().map(|d| compiled.evaluate(*d)).collect();
    assert_eq!(results, [true, false, false]);
  }

  #[test]
  fn compile_rejects_bad_pattern_in_any_branch() {
    let p = Predicate::or(vec![
      Predicate::and(vec![]),
      Predicate::matches(Field::SubmittedTo, "["),
    ]);
    assert!(matches!(p.compile(), Err(crate::Error::InvalidPattern(_))));
  }

  #[test]
  fn serialized_shape() {
    let p = Predicate::and(vec![
      Predicate::equals(Field::RecipientRole, "hod"),
      Predicate::is_null(Field::SubmittedTo),
    ]);
    let json = serde_json::to_value(&p).unwrap();
    assert_eq!(
      json,
      serde_json::json!({
        "op": "and",
        "all": [
          { "op": "eq", "field": "recipientRole", "value": "hod" },
          { "op": "is_null", "field": "submittedTo" },
        ],
      })
    );
    let back: Predicate = serde_json::from_value(json).unwrap();
    assert_eq!(back, p);
  }
}
