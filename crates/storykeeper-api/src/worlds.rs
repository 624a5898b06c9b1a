//! Handlers for `/api/worlds` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/worlds` | The caller's worlds |
//! | `POST`   | `/api/worlds` | Body: `{"name":..,"currentYear":..,"startYear"?:..,"description"?:..}` |
//! | `GET`    | `/api/worlds/{id}` | 404 if absent or not owned |
//! | `PATCH`  | `/api/worlds/{id}` | Only present fields change |
//! | `DELETE` | `/api/worlds/{id}` | 204; cascades to figures and events |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use storykeeper_core::{
  services::WorldService,
  world::{NewWorld, World, WorldPatch},
};

use crate::{AppState, AppStore, error::ApiError, identity::Caller};

/// `GET /api/worlds`
pub async fn list<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<World>>, ApiError> {
  let worlds = WorldService::new(state.store.as_ref()).list(&caller).await?;
  Ok(Json(worlds))
}

/// `POST /api/worlds`
pub async fn create<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Json(body): Json<NewWorld>,
) -> Result<impl IntoResponse, ApiError> {
  let world = WorldService::new(state.store.as_ref()).create(&caller, body).await?;
  Ok((StatusCode::CREATED, Json(world)))
}

/// `GET /api/worlds/{id}`
pub async fn get_one<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<World>, ApiError> {
  let world = WorldService::new(state.store.as_ref()).get(&caller, id).await?;
  Ok(Json(world))
}

/// `PATCH /api/worlds/{id}`
pub async fn update<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<WorldPatch>,
) -> Result<Json<World>, ApiError> {
  let world = WorldService::new(state.store.as_ref()).update(&caller, id, body).await?;
  Ok(Json(world))
}

/// `DELETE /api/worlds/{id}`
pub async fn delete<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  WorldService::new(state.store.as_ref()).delete(&caller, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
