//! Authorization policy: the second of the two request stages.
//!
//! A static route table decides whether a path needs an identity. The first
//! matching rule wins; paths no rule matches are public.

use axum::{
  extract::Request,
  middleware::Next,
  response::{IntoResponse as _, Response},
};
use storykeeper_core::identity::Identity;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
  Public,
  Authenticated,
}

#[derive(Debug, Clone, Copy)]
enum Pattern {
  Exact(&'static str),
  Prefix(&'static str),
}

impl Pattern {
  fn matches(self, path: &str) -> bool {
    match self {
      Pattern::Exact(p) => path == p,
      Pattern::Prefix(p) => path.starts_with(p),
    }
  }
}

const RULES: &[(Pattern, Access)] = &[
  (Pattern::Exact("/api/register"), Access::Public),
  (Pattern::Exact("/api/login"), Access::Public),
  (Pattern::Prefix("/api/"), Access::Authenticated),
];

/// Look up the access rule for `path`.
pub fn access_for(path: &str) -> Access {
  RULES
    .iter()
    .find(|(pattern, _)| pattern.matches(path))
    .map_or(Access::Public, |(_, access)| *access)
}

/// Middleware: reject with 401 when the route needs an identity and the
/// identity stage attached none. Runs before any handler logic.
pub async fn enforce(req: Request, next: Next) -> Response {
  if access_for(req.uri().path()) == Access::Authenticated
    && req.extensions().get::<Identity>().is_none()
  {
    tracing::debug!(path = req.uri().path(), "rejecting anonymous request");
    return ApiError::Unauthenticated.into_response();
  }
  next.run(req).await
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn auth_endpoints_are_public() {
    assert_eq!(access_for("/api/login"), Access::Public);
    assert_eq!(access_for("/api/register"), Access::Public);
  }

  #[test]
  fn api_namespace_needs_identity() {
    assert_eq!(access_for("/api/me"), Access::Authenticated);
    assert_eq!(access_for("/api/worlds"), Access::Authenticated);
    assert_eq!(access_for("/api/figures/7/events/3"), Access::Authenticated);
    assert_eq!(access_for("/api/login/extra"), Access::Authenticated);
  }

  #[test]
  fn everything_else_is_public() {
    assert_eq!(access_for("/health"), Access::Public);
    assert_eq!(access_for("/"), Access::Public);
    assert_eq!(access_for("/apiary"), Access::Public);
  }
}
