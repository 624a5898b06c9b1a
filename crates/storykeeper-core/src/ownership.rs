//! The ownership resolver: the single authorization choke point.
//!
//! Every scoped read or write loads its target through here. A resource that
//! does not exist and a resource owned by someone else both come back as
//! [`Error::NotFound`], so nothing downstream can leak existence across
//! tenants.
//!
//! Figures and events are scoped through the world id persisted on the
//! entity itself, never through a world id supplied by the caller.

use crate::{
  Error, Result,
  event::Event,
  figure::Figure,
  identity::Identity,
  store::WorldStore,
  world::World,
};

/// The kinds of resource the resolver can scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
  World,
  Figure,
  Event,
}

/// A resource that has been resolved for the caller.
#[derive(Debug, Clone)]
pub enum Resource {
  World(World),
  Figure(Owned<Figure>),
  Event(Owned<Event>),
}

/// A world-scoped entity together with the world it was resolved through.
#[derive(Debug, Clone)]
pub struct Owned<T> {
  pub entity: T,
  pub world:  World,
}

pub struct OwnershipResolver<'s, S> {
  store: &'s S,
}

impl<'s, S: WorldStore> OwnershipResolver<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Resolve any kind of resource by id.
  pub async fn resolve(
    &self,
    caller: &Identity,
    kind: ResourceKind,
    id: i64,
  ) -> Result<Resource> {
    Ok(match kind {
      ResourceKind::World => Resource::World(self.world(caller, id).await?),
      ResourceKind::Figure => Resource::Figure(self.figure(caller, id).await?),
      ResourceKind::Event => Resource::Event(self.event(caller, id).await?),
    })
  }

  /// A world, only if `caller` owns it.
  pub async fn world(&self, caller: &Identity, id: i64) -> Result<World> {
    self
      .store
      .world_by_id_and_owner(id, caller.id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| {
        tracing::debug!(world_id = id, caller = caller.id, "world not resolved");
        Error::NotFound
      })
  }

  /// A figure, only if `caller` owns its world.
  pub async fn figure(&self, caller: &Identity, id: i64) -> Result<Owned<Figure>> {
    let figure = self
      .store
      .figure_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)?;
    let world = self.world(caller, figure.world_id).await?;
    Ok(Owned { entity: figure, world })
  }

  /// An event, only if `caller` owns its world.
  pub async fn event(&self, caller: &Identity, id: i64) -> Result<Owned<Event>> {
    let event = self
      .store
      .event_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)?;
    let world = self.world(caller, event.world_id).await?;
    Ok(Owned { entity: event, world })
  }
}
