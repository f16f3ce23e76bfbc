//! Principal roles.

use serde::{Deserialize, Serialize};

/// The role a principal acts under. Parsed leniently: unknown role strings
/// are kept verbatim in [`Role::Other`] rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Staff,
  /// Head of department.
  Hod,
  Dean,
  Admin,
  #[serde(untagged)]
  Other(String),
}

impl Role {
  /// Trimmed, case-insensitive parse.
  pub fn parse(value: &str) -> Self {
    let trimmed = value.trim();
    match trimmed.to_lowercase().as_str() {
      "student" => Self::Student,
      "staff" => Self::Staff,
      "hod" => Self::Hod,
      "dean" => Self::Dean,
      "admin" => Self::Admin,
      _ => Self::Other(trimmed.to_owned()),
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Self::Student => "student",
      Self::Staff => "staff",
      Self::Hod => "hod",
      Self::Dean => "dean",
      Self::Admin => "admin",
      Self::Other(s) => s,
    }
  }

  pub fn is_hod(&self) -> bool { matches!(self, Self::Hod) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_is_case_insensitive() {
    assert_eq!(Role::parse("HoD"), Role::Hod);
    assert_eq!(Role::parse(" hod "), Role::Hod);
    assert_eq!(Role::parse("ADMIN"), Role::Admin);
  }

  #[test]
  fn unknown_roles_are_preserved() {
    assert_eq!(Role::parse(" Registrar "), Role::Other("Registrar".into()));
    assert_eq!(Role::parse("Registrar").as_str(), "Registrar");
    assert!(!Role::parse("").is_hod());
  }
}
