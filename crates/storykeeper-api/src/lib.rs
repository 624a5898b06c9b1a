//! JSON REST API for Storykeeper.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`CredentialStore`] and [`WorldStore`]. Every request passes through two
//! stages before reaching a handler:
//!
//! 1. [`identity::resolve_identity`] attaches the caller's identity when a
//!    valid bearer token is present, and never rejects.
//! 2. [`policy::enforce`] rejects anonymous requests to protected routes.
//!
//! Handlers then go through the scoped services in `storykeeper-core`, so
//! every resource is resolved against the caller before it is read or
//! changed.

pub mod error;
pub mod events;
pub mod figures;
pub mod identity;
pub mod policy;
pub mod session;
pub mod worlds;

use std::sync::Arc;

use axum::{
  Router,
  middleware,
  routing::{get, post},
};
use storykeeper_auth::{Argon2Hasher, TokenService};
use storykeeper_core::store::{CredentialStore, WorldStore};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// A store the API can run on.
pub trait AppStore: CredentialStore + WorldStore + 'static {}

impl<T> AppStore for T where T: CredentialStore + WorldStore + 'static {}

/// Shared state threaded through all handlers and middleware.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub hasher: Arc<Argon2Hasher>,
  pub tokens: Arc<TokenService>,
}

impl<S> AppState<S> {
  /// Build state around `store`, signing tokens with `jwt_secret`.
  ///
  /// A missing secret is allowed here; token issuance then fails and every
  /// bearer token is treated as invalid.
  pub fn new(store: S, jwt_secret: Option<String>) -> storykeeper_core::Result<Self> {
    Ok(Self {
      store:  Arc::new(store),
      hasher: Arc::new(Argon2Hasher::new()?),
      tokens: Arc::new(TokenService::new(jwt_secret)),
    })
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      hasher: Arc::clone(&self.hasher),
      tokens: Arc::clone(&self.tokens),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S: AppStore>(state: AppState<S>) -> Router {
  Router::new()
    .route("/health", get(health))
    // Session
    .route("/api/register", post(session::register::<S>))
    .route("/api/login", post(session::login::<S>))
    .route("/api/me", get(session::me))
    // Worlds
    .route("/api/worlds", get(worlds::list::<S>).post(worlds::create::<S>))
    .route(
      "/api/worlds/{id}",
      get(worlds::get_one::<S>)
        .patch(worlds::update::<S>)
        .delete(worlds::delete::<S>),
    )
    // Figures
    .route("/api/figures", get(figures::list::<S>).post(figures::create::<S>))
    .route(
      "/api/figures/{id}",
      get(figures::get_one::<S>)
        .patch(figures::update::<S>)
        .delete(figures::delete::<S>),
    )
    .route(
      "/api/figures/{id}/events/{event_id}",
      post(figures::link::<S>).delete(figures::unlink::<S>),
    )
    // Events
    .route("/api/events", get(events::list::<S>).post(events::create::<S>))
    .route(
      "/api/events/{id}",
      get(events::get_one::<S>)
        .patch(events::update::<S>)
        .delete(events::delete::<S>),
    )
    .route(
      "/api/events/{id}/figures/{figure_id}",
      post(events::link::<S>).delete(events::unlink::<S>),
    )
    // Layers run bottom-up: identity first, then policy.
    .layer(middleware::from_fn(policy::enforce))
    .layer(middleware::from_fn_with_state(
      state.clone(),
      identity::resolve_identity::<S>,
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn health() -> &'static str { "ok" }

// ─── Integration tests ────────────────────────────────────────────────────────
