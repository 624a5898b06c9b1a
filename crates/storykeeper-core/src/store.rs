//! Store traits.
//!
//! Implemented by storage backends (e.g. `storykeeper-store-sqlite`). The
//! scoped services and the API layer depend on these abstractions, never on a
//! concrete backend.
//!
//! None of these methods make authorization decisions. Lookups by bare id
//! return whatever exists; scoping to the caller happens in
//! [`OwnershipResolver`](crate::ownership::OwnershipResolver).

use std::future::Future;

use crate::{
  event::{Event, NewEvent},
  figure::{Figure, NewFigure},
  identity::{Identity, NewIdentity},
  world::{NewWorld, World},
};

// ─── Credentials ─────────────────────────────────────────────────────────────

/// Persistence of user identities.
pub trait CredentialStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether an identity with exactly this email exists.
  fn identity_exists<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Look up an identity by email (case-sensitive). `None` if unknown.
  fn find_identity_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + 'a;

  /// Insert a new identity. Returns `None` if the email is already taken,
  /// leaving the store unchanged.
  fn insert_identity(
    &self,
    input: NewIdentity,
  ) -> impl Future<Output = Result<Option<Identity>, Self::Error>> + Send + '_;
}

// ─── Worlds, figures, events ─────────────────────────────────────────────────

/// Persistence of worlds and their contents.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait WorldStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Worlds ────────────────────────────────────────────────────────────

  /// Persist a new world owned by `owner_id`. `input` is already validated.
  fn insert_world(
    &self,
    owner_id: i64,
    input: NewWorld,
  ) -> impl Future<Output = Result<World, Self::Error>> + Send + '_;

  /// Load a world only if it is owned by `owner_id`.
  fn world_by_id_and_owner(
    &self,
    id: i64,
    owner_id: i64,
  ) -> impl Future<Output = Result<Option<World>, Self::Error>> + Send + '_;

  /// All worlds owned by `owner_id`, in creation order.
  fn worlds_by_owner(
    &self,
    owner_id: i64,
  ) -> impl Future<Output = Result<Vec<World>, Self::Error>> + Send + '_;

  /// Overwrite the mutable fields of an existing world and bump `updated_at`.
  /// Returns `None` if the world no longer exists.
  fn save_world(
    &self,
    world: World,
  ) -> impl Future<Output = Result<Option<World>, Self::Error>> + Send + '_;

  /// Delete a world together with its figures, events and links.
  fn delete_world(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Figures ───────────────────────────────────────────────────────────

  /// Returns `None` if the world no longer exists.
  fn insert_figure(
    &self,
    world_id: i64,
    input: NewFigure,
  ) -> impl Future<Output = Result<Option<Figure>, Self::Error>> + Send + '_;

  /// Load a figure by id regardless of owner.
  fn figure_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Figure>, Self::Error>> + Send + '_;

  /// One page of a world's figures in creation order, optionally filtered by
  /// a case-insensitive substring of name or description, plus the total
  /// number of matches.
  fn figures_in_world(
    &self,
    world_id: i64,
    search: Option<String>,
    limit: u32,
    offset: u64,
  ) -> impl Future<Output = Result<(Vec<Figure>, u64), Self::Error>> + Send + '_;

  /// Returns `None` if the figure no longer exists.
  fn save_figure(
    &self,
    figure: Figure,
  ) -> impl Future<Output = Result<Option<Figure>, Self::Error>> + Send + '_;

  /// Delete a figure and its links. Linked events are kept.
  fn delete_figure(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Events ────────────────────────────────────────────────────────────

  /// Returns `None` if the world no longer exists.
  fn insert_event(
    &self,
    world_id: i64,
    input: NewEvent,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Load an event by id regardless of owner.
  fn event_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// All events of a world ordered by year.
  fn events_in_world(
    &self,
    world_id: i64,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Returns `None` if the event no longer exists.
  fn save_event(
    &self,
    event: Event,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + '_;

  /// Delete an event and its links. Linked figures are kept.
  fn delete_event(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Links ─────────────────────────────────────────────────────────────

  /// Record a figure↔event link. Linking an already-linked pair is a no-op.
  /// Returns `false` if either side no longer exists.
  fn link(
    &self,
    figure_id: i64,
    event_id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Remove a figure↔event link if present.
  fn unlink(
    &self,
    figure_id: i64,
    event_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
