use crate::{
  Error, Result,
  event::{Event, EventPatch, NewEvent},
  identity::Identity,
  link::assert_same_world,
  ownership::OwnershipResolver,
  store::WorldStore,
};

/// Event CRUD and figure linking scoped to the caller.
///
/// Ownership is always resolved before the year is checked, so a caller who
/// does not own the world sees `NotFound` rather than `InvalidYear`.
pub struct EventService<'s, S> {
  store: &'s S,
}

impl<'s, S: WorldStore> EventService<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  fn owned(&self) -> OwnershipResolver<'s, S> { OwnershipResolver::new(self.store) }

  pub async fn create(
    &self,
    caller: &Identity,
    world_id: i64,
    input: NewEvent,
  ) -> Result<Event> {
    let world = self.owned().world(caller, world_id).await?;
    input.validate()?;
    world.check_year(input.year)?;
    self
      .store
      .insert_event(world.id, input)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }

  pub async fn get(&self, caller: &Identity, id: i64) -> Result<Event> {
    Ok(self.owned().event(caller, id).await?.entity)
  }

  /// All events of the world, ordered by year.
  pub async fn list(&self, caller: &Identity, world_id: i64) -> Result<Vec<Event>> {
    let world = self.owned().world(caller, world_id).await?;
    self.store.events_in_world(world.id).await.map_err(Error::store)
  }

  /// A new year is checked against the world's current bounds; an unchanged
  /// year is not re-checked.
  pub async fn update(
    &self,
    caller: &Identity,
    id: i64,
    patch: EventPatch,
  ) -> Result<Event> {
    let owned = self.owned().event(caller, id).await?;
    patch.validate()?;
    if let Some(year) = patch.year {
      owned.world.check_year(year)?;
    }
    let mut event = owned.entity;
    patch.apply(&mut event);
    self
      .store
      .save_event(event)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }

  pub async fn delete(&self, caller: &Identity, id: i64) -> Result<()> {
    let event = self.owned().event(caller, id).await?.entity;
    self.store.delete_event(event.id).await.map_err(Error::store)
  }

  /// Link a figure from the event side; returns the refreshed event.
  pub async fn link_figure(
    &self,
    caller: &Identity,
    event_id: i64,
    figure_id: i64,
  ) -> Result<Event> {
    let event = self.owned().event(caller, event_id).await?.entity;
    let figure = self.owned().figure(caller, figure_id).await?.entity;
    assert_same_world(&figure, &event)?;
    if !self.store.link(figure.id, event.id).await.map_err(Error::store)? {
      return Err(Error::NotFound);
    }
    self.reload(event.id).await
  }

  pub async fn unlink_figure(
    &self,
    caller: &Identity,
    event_id: i64,
    figure_id: i64,
  ) -> Result<Event> {
    let event = self.owned().event(caller, event_id).await?.entity;
    let figure = self.owned().figure(caller, figure_id).await?.entity;
    self.store.unlink(figure.id, event.id).await.map_err(Error::store)?;
    self.reload(event.id).await
  }

  async fn reload(&self, id: i64) -> Result<Event> {
    self
      .store
      .event_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }
}
