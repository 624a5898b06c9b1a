use crate::{
  Error, Result,
  identity::Identity,
  ownership::OwnershipResolver,
  store::WorldStore,
  world::{NewWorld, World, WorldPatch},
};

/// World CRUD scoped to the caller.
pub struct WorldService<'s, S> {
  store: &'s S,
}

impl<'s, S: WorldStore> WorldService<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  fn owned(&self) -> OwnershipResolver<'s, S> { OwnershipResolver::new(self.store) }

  pub async fn create(&self, caller: &Identity, input: NewWorld) -> Result<World> {
    input.validate()?;
    let world = self
      .store
      .insert_world(caller.id, input)
      .await
      .map_err(Error::store)?;
    tracing::info!(world_id = world.id, owner = caller.id, "world created");
    Ok(world)
  }

  pub async fn get(&self, caller: &Identity, id: i64) -> Result<World> {
    self.owned().world(caller, id).await
  }

  pub async fn list(&self, caller: &Identity) -> Result<Vec<World>> {
    self.store.worlds_by_owner(caller.id).await.map_err(Error::store)
  }

  /// Narrowing the bounds does not re-validate existing events.
  pub async fn update(
    &self,
    caller: &Identity,
    id: i64,
    patch: WorldPatch,
  ) -> Result<World> {
    let mut world = self.owned().world(caller, id).await?;
    patch.apply(&mut world)?;
    self
      .store
      .save_world(world)
      .await
      .map_err(Error::store)?
      .ok_or(Error::NotFound)
  }

  pub async fn delete(&self, caller: &Identity, id: i64) -> Result<()> {
    let world = self.owned().world(caller, id).await?;
    self.store.delete_world(world.id).await.map_err(Error::store)?;
    tracing::info!(world_id = id, owner = caller.id, "world deleted");
    Ok(())
  }
}
