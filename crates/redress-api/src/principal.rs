//! The acting principal, read from gateway-supplied headers.
//!
//! Authentication happens upstream. The gateway forwards the verified
//! identity as `x-user-id`, `x-user-role` and `x-user-department`.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, request::Parts},
};
use redress_core::{role::Role, scope::ScopedUser};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const DEPARTMENT_HEADER: &str = "x-user-department";

/// The user a request acts on behalf of.
#[derive(Debug, Clone)]
pub struct Principal {
  pub user_id:    String,
  pub role:       Role,
  pub department: Option<String>,
}

impl Principal {
  /// Read the principal from request headers. Only the user id is required.
  pub fn from_headers(headers: &HeaderMap) -> Result<Self, ApiError> {
    let user_id = header(headers, USER_ID_HEADER).ok_or_else(|| {
      ApiError::Unauthorized(format!("missing {USER_ID_HEADER} header"))
    })?;
    Ok(Self {
      user_id,
      role: header(headers, ROLE_HEADER)
        .map(|r| Role::parse(&r))
        .unwrap_or(Role::Student),
      department: header(headers, DEPARTMENT_HEADER),
    })
  }

  /// The scope-filter view of this principal. A missing department is passed
  /// through as empty and rejected by the scope builder.
  pub fn scoped_user(&self) -> ScopedUser {
    ScopedUser::new(
      self.user_id.clone(),
      self.department.clone().unwrap_or_default(),
    )
  }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
  headers
    .get(name)
    .and_then(|v| v.to_str().ok())
    .map(str::trim)
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
}

impl<S> FromRequestParts<S> for Principal
where
  S: Send + Sync,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    Principal::from_headers(&parts.headers)
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;

  use super::*;

  fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (k, v) in pairs {
      map.insert(*k, HeaderValue::from_static(*v));
    }
    map
  }

  #[test]
  fn missing_user_id_is_unauthorized() {
    let err = Principal::from_headers(&headers(&[(ROLE_HEADER, "hod")]))
      .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn blank_user_id_is_unauthorized() {
    let err = Principal::from_headers(&headers(&[(USER_ID_HEADER, "  ")]))
      .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
  }

  #[test]
  fn role_defaults_to_student() {
    let p = Principal::from_headers(&headers(&[(USER_ID_HEADER, "s-1")])).unwrap();
    assert_eq!(p.role, Role::Student);
    assert!(p.department.is_none());
    assert_eq!(p.scoped_user().department, "");
  }

  #[test]
  fn reads_all_headers() {
    let p = Principal::from_headers(&headers(&[
      (USER_ID_HEADER, "hod-1"),
      (ROLE_HEADER, "HoD"),
      (DEPARTMENT_HEADER, " IT "),
    ]))
    .unwrap();
    assert_eq!(p.role, Role::Hod);
    assert_eq!(p.scoped_user(), ScopedUser::new("hod-1", "IT"));
  }
}
