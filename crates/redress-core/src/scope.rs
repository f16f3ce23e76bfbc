//! Department-scoped complaint visibility.
//!
//! [`build_scope_filter`] turns a department head (or any similarly scoped
//! principal) into a [`Predicate`] describing the complaints they may see.
//! Nothing is queried here; the caller hands the predicate to a store.

use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  predicate::{Field, Predicate},
  role::Role,
};

/// Complaints routed to any of these offices are hidden from department-wide
/// visibility unless the viewer (or their staff) is assigned.
const ESCALATED_ROUTING: &str = "admin|dean";

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// The principal whose visibility is being computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopedUser {
  pub user_id:    String,
  /// Compared case-insensitively against complaint departments. Leading and
  /// trailing whitespace is ignored on both sides of the comparison.
  pub department: String,
}

impl ScopedUser {
  pub fn new(user_id: impl Into<String>, department: impl Into<String>) -> Self {
    Self { user_id: user_id.into(), department: department.into() }
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeOptions {
  /// Staff reporting to this user; complaints assigned to them are visible.
  #[serde(default)]
  pub staff_ids:        Vec<String>,
  /// Only show complaints assigned to, or explicitly addressed to, this user.
  #[serde(default)]
  pub strict_recipient: bool,
}

// ─── Builder ─────────────────────────────────────────────────────────────────

/// Build the visibility predicate for `user`.
///
/// A complaint is visible when all of the following hold:
///
/// 1. it is not soft-deleted;
/// 2. its department equals the user's, ignoring case and surrounding
///    whitespace on both sides;
/// 3. it is assigned to the user or their staff, or addressed to the user as
///    HoD;
/// 4. it is not routed to the admin or dean offices, unless assigned to the
///    user or their staff.
///
/// With `strict_recipient` the result is further narrowed to complaints
/// assigned to, or addressed to, the user personally.
///
/// Fails with [`Error::InvalidScopeUser`] if the user has no id or no
/// department.
pub fn build_scope_filter(
  user: &ScopedUser,
  options: &ScopeOptions,
) -> Result<Predicate> {
  let user_id = user.user_id.trim();
  let department = user.department.trim();
  if user_id.is_empty() {
    return Err(Error::InvalidScopeUser("missing user id".into()));
  }
  if department.is_empty() {
    return Err(Error::InvalidScopeUser(format!(
      "user {user_id} has no department"
    )));
  }

  let staff_ids: Vec<String> = options
    .staff_ids
    .iter()
    .map(|id| id.trim())
    .filter(|id| !id.is_empty())
    .map(str::to_owned)
    .collect();

  // Assigned to this user or to one of their staff.
  let assigned_to_team = || {
    let mut any = vec![Predicate::equals(Field::AssignedTo, user_id)];
    if !staff_ids.is_empty() {
      any.push(Predicate::one_of(Field::AssignedTo, staff_ids.clone()));
    }
    any
  };

  let addressed_to_user = Predicate::and(vec![
    Predicate::equals(Field::RecipientRole, Role::Hod.as_str()),
    Predicate::equals(Field::RecipientId, user_id),
  ]);

  let mut reachable = assigned_to_team();
  reachable.push(addressed_to_user.clone());

  let mut not_escalated = vec![
    Predicate::is_null(Field::SubmittedTo),
    Predicate::negate(Predicate::matches_ci(
      Field::SubmittedTo,
      ESCALATED_ROUTING,
    )),
  ];
  not_escalated.extend(assigned_to_team());

  let mut all = vec![
    Predicate::negate(Predicate::equals(Field::IsDeleted, true)),
    Predicate::matches_ci(
      Field::Department,
      format!(r"^\s*{}\s*$", regex::escape(department)),
    ),
    Predicate::or(reachable),
    Predicate::or(not_escalated),
  ];

  if options.strict_recipient {
    all.push(Predicate::or(vec![
      Predicate::equals(Field::AssignedTo, user_id),
      addressed_to_user,
    ]));
  }

  Ok(Predicate::and(all))
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::predicate::{FieldSource, FieldValue};

  #[derive(Default, Clone)]
  struct Doc(HashMap<Field, FieldValue<'static>>);

  impl Doc {
    fn in_dept(department: &'static str) -> Self {
      Self::default().with(Field::Department, FieldValue::Str(department))
    }

    fn with(mut self, field: Field, value: FieldValue<'static>) -> Self {
      self.0.insert(field, value);
      self
    }

    fn str(self, field: Field, value: &'static str) -> Self {
      self.with(field, FieldValue::Str(value))
    }
  }

  impl FieldSource for Doc {
    fn field(&self, field: Field) -> Option<FieldValue<'_>> {
      self.0.get(&field).copied()
    }
  }

  fn hod() -> ScopedUser { ScopedUser::new("hod-1", "IT") }

  fn visible(filter: &Predicate, doc: &Doc) -> bool {
    filter.evaluate(doc).unwrap()
  }

  #[test]
  fn missing_department_is_rejected() {
    let user = ScopedUser::new("hod-1", "  ");
    let err = build_scope_filter(&user, &ScopeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidScopeUser(_)));
  }

  #[test]
  fn missing_id_is_rejected() {
    let user = ScopedUser::new("", "IT");
    let err = build_scope_filter(&user, &ScopeOptions::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidScopeUser(_)));
  }

  #[test]
  fn dean_routed_complaint_hidden_unless_assigned_to_user() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();

    let routed = Doc::in_dept("it")
      .str(Field::AssignedTo, "someone-else")
      .str(Field::SubmittedTo, "dean office");
    assert!(!visible(&filter, &routed));

    let assigned = Doc::in_dept("it")
      .str(Field::AssignedTo, "hod-1")
      .str(Field::SubmittedTo, "dean office");
    assert!(visible(&filter, &assigned));
  }

  #[test]
  fn admin_routing_matches_case_insensitively() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    let doc = Doc::in_dept("IT")
      .str(Field::RecipientRole, "hod")
      .str(Field::RecipientId, "hod-1")
      .str(Field::SubmittedTo, "ADMIN");
    assert!(!visible(&filter, &doc));

    let doc = doc.str(Field::SubmittedTo, "registrar");
    assert!(visible(&filter, &doc));
  }

  #[test]
  fn addressed_to_hod_is_visible() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    let doc = Doc::in_dept("It")
      .str(Field::RecipientRole, "hod")
      .str(Field::RecipientId, "hod-1");
    assert!(visible(&filter, &doc));

    let other_hod = doc.clone().str(Field::RecipientId, "hod-2");
    assert!(!visible(&filter, &other_hod));
  }

  #[test]
  fn department_alone_is_not_enough() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    assert!(!visible(&filter, &Doc::in_dept("IT")));
  }

  #[test]
  fn department_must_match_whole_string() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    for dept in ["Information IT", "ITS", "xit"] {
      let doc = Doc::in_dept(dept).str(Field::AssignedTo, "hod-1");
      assert!(!visible(&filter, &doc), "department {dept:?}");
    }
  }

  #[test]
  fn department_ignores_surrounding_whitespace() {
    let user = ScopedUser::new("hod-1", "  IT ");
    let filter = build_scope_filter(&user, &ScopeOptions::default()).unwrap();
    for dept in ["IT", " it", "IT\t", "\n IT  "] {
      let doc = Doc::in_dept(dept).str(Field::AssignedTo, "hod-1");
      assert!(visible(&filter, &doc), "department {dept:?}");
    }
    let inner = Doc::in_dept("I T").str(Field::AssignedTo, "hod-1");
    assert!(!visible(&filter, &inner));
  }

  #[test]
  fn department_metacharacters_are_literal() {
    let user = ScopedUser::new("hod-1", "C++ (Systems).*");
    let filter = build_scope_filter(&user, &ScopeOptions::default()).unwrap();

    let exact = Doc::in_dept("c++ (systems).*").str(Field::AssignedTo, "hod-1");
    assert!(visible(&filter, &exact));

    let broadened =
      Doc::in_dept("C++ (Systems)-anything").str(Field::AssignedTo, "hod-1");
    assert!(!visible(&filter, &broadened));
  }

  #[test]
  fn deleted_complaints_are_hidden() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    let doc = Doc::in_dept("IT").str(Field::AssignedTo, "hod-1");
    assert!(visible(&filter, &doc));
    let doc = doc.with(Field::IsDeleted, FieldValue::Bool(true));
    assert!(!visible(&filter, &doc));
  }

  #[test]
  fn staff_assignment_grants_visibility_and_routing_override() {
    let options = ScopeOptions {
      staff_ids:        vec!["staff-1".into(), " ".into()],
      strict_recipient: false,
    };
    let filter = build_scope_filter(&hod(), &options).unwrap();
    let doc = Doc::in_dept("IT")
      .str(Field::AssignedTo, "staff-1")
      .str(Field::SubmittedTo, "Dean");
    assert!(visible(&filter, &doc));

    let unknown = doc.clone().str(Field::AssignedTo, "staff-9");
    assert!(!visible(&filter, &unknown));
  }

  #[test]
  fn strict_mode_drops_staff_only_visibility() {
    let options = ScopeOptions {
      staff_ids:        vec!["staff-1".into()],
      strict_recipient: true,
    };
    let filter = build_scope_filter(&hod(), &options).unwrap();

    let via_staff = Doc::in_dept("IT").str(Field::AssignedTo, "staff-1");
    assert!(!visible(&filter, &via_staff));

    let direct = Doc::in_dept("IT").str(Field::AssignedTo, "hod-1");
    assert!(visible(&filter, &direct));

    let addressed = via_staff
      .str(Field::RecipientRole, "hod")
      .str(Field::RecipientId, "hod-1");
    assert!(visible(&filter, &addressed));
  }

  #[test]
  fn strict_mode_keeps_base_clauses() {
    let options = ScopeOptions { staff_ids: vec![], strict_recipient: true };
    let filter = build_scope_filter(&hod(), &options).unwrap();
    let other_dept = Doc::in_dept("Physics").str(Field::AssignedTo, "hod-1");
    assert!(!visible(&filter, &other_dept));
  }

  #[test]
  fn empty_staff_list_emits_no_set_clause() {
    let filter = build_scope_filter(&hod(), &ScopeOptions::default()).unwrap();
    let debug = format!("{filter:?}");
    assert!(!debug.contains("In {"), "{debug}");
  }
}
