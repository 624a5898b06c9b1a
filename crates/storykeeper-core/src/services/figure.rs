use crate::{
  Error, Result,
  figure::{Figure, FigurePatch, FigureQuery, NewFigure},
  identity::Identity,
  link::assert_same_world,
  ownership::OwnershipResolver,
  page::{Page, PageRequest},
  store::WorldStore,
};

/// Figure CRUD, search and event linking scoped to the caller.
pub struct FigureService<'s, S> {
  store: &'s S,
}

impl<'s, S: WorldStore> FigureService<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  fn owned(&self) -> OwnershipResolver<'s, S> { OwnershipResolver::new(self.store) }

  pub async fn create(
    &self,
    caller: &Identity,
    world_id: i64,
    input: NewFigure,
  ) -> Result<Figure> {
    let world = self.owned().world(caller, world_id).await?;
    input.validate()?;
    self
      .store
      .insert_figure(world.id, input)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }

  pub async fn get(&self, caller: &Identity, id: i64) -> Result<Figure> {
    Ok(self.owned().figure(caller, id).await?.entity)
  }

  /// One page of the world's figures, oldest first.
  pub async fn list(
    &self,
    caller: &Identity,
    world_id: i64,
    query: FigureQuery,
  ) -> Result<Page<Figure>> {
    let world = self.owned().world(caller, world_id).await?;
    let request = PageRequest::new(query.page, query.limit);
    let search = query.search.filter(|s| !s.trim().is_empty());
    let (items, total) = self
      .store
      .figures_in_world(world.id, search, request.size(), request.offset())
      .await
      .map_err(Error::store)?;
    Ok(Page::new(items, total, request))
  }

  pub async fn update(
    &self,
    caller: &Identity,
    id: i64,
    patch: FigurePatch,
  ) -> Result<Figure> {
    let mut figure = self.owned().figure(caller, id).await?.entity;
    patch.apply(&mut figure)?;
    self
      .store
      .save_figure(figure)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }

  pub async fn delete(&self, caller: &Identity, id: i64) -> Result<()> {
    let figure = self.owned().figure(caller, id).await?.entity;
    self.store.delete_figure(figure.id).await.map_err(Error::store)
  }

  /// Link a figure to an event in the same world; returns the refreshed figure.
  pub async fn link_event(
    &self,
    caller: &Identity,
    figure_id: i64,
    event_id: i64,
  ) -> Result<Figure> {
    let figure = self.owned().figure(caller, figure_id).await?.entity;
    let event = self.owned().event(caller, event_id).await?.entity;
    assert_same_world(&figure, &event)?;
    if !self.store.link(figure.id, event.id).await.map_err(Error::store)? {
      return Err(Error::NotFound);
    }
    self.reload(figure.id).await
  }

  /// Remove a link if present. Unlinking a pair that was never linked
  /// succeeds without changes.
  pub async fn unlink_event(
    &self,
    caller: &Identity,
    figure_id: i64,
    event_id: i64,
  ) -> Result<Figure> {
    let figure = self.owned().figure(caller, figure_id).await?.entity;
    let event = self.owned().event(caller, event_id).await?.entity;
    self.store.unlink(figure.id, event.id).await.map_err(Error::store)?;
    self.reload(figure.id).await
  }

  async fn reload(&self, id: i64) -> Result<Figure> {
    self
      .store
      .figure_by_id(id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }
}
