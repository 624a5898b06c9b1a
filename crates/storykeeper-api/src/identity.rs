//! Identity resolution: the first of the two request stages.
//!
//! [`resolve_identity`] attaches the caller's [`Identity`] to the request
//! extensions when a valid bearer token names a stored identity, and
//! otherwise lets the request through as anonymous. It never rejects; that
//! is [`policy::enforce`](crate::policy::enforce)'s job.

use axum::{
  extract::{FromRequestParts, Request, State},
  http::{HeaderMap, header, request::Parts},
  middleware::Next,
  response::Response,
};
use storykeeper_auth::AuthService;
use storykeeper_core::identity::Identity;

use crate::{AppState, AppStore, error::ApiError};

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// Any other scheme, a missing header or an empty token yields `None`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .map(str::trim)
    .filter(|t| !t.is_empty())
}

/// Middleware: populate the identity slot, or leave it empty.
pub async fn resolve_identity<S: AppStore>(
  State(state): State<AppState<S>>,
  mut req: Request,
  next: Next,
) -> Response {
  if let Some(token) = bearer_token(req.headers()).map(str::to_owned) {
    let auth = AuthService::new(state.store.as_ref(), state.hasher.as_ref(), state.tokens.as_ref());
    match auth.identity_for_token(&token).await {
      Some(identity) => {
        tracing::debug!(identity_id = identity.id, "request authenticated");
        req.extensions_mut().insert(identity);
      }
      None => tracing::debug!("proceeding anonymously"),
    }
  }
  next.run(req).await
}

/// The authenticated caller, as attached by [`resolve_identity`].
///
/// Handlers behind the policy stage can rely on it being present; if it is
/// not, the request is rejected with 401.
pub struct Caller(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
  type Rejection = ApiError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<Identity>()
      .cloned()
      .map(Caller)
      .ok_or(ApiError::Unauthenticated)
  }
}
