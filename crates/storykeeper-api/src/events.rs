//! Handlers for `/api/events` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/events?worldId=..` | Ordered by year |
//! | `POST`   | `/api/events` | Body: `{"worldId":..,"title":..,"year":..,"description"?:..}` |
//! | `GET`    | `/api/events/{id}` | |
//! | `PATCH`  | `/api/events/{id}` | A new year must fit the world |
//! | `DELETE` | `/api/events/{id}` | |
//! | `POST`   | `/api/events/{id}/figures/{figure_id}` | Link; same world only |
//! | `DELETE` | `/api/events/{id}/figures/{figure_id}` | Unlink |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use serde_json::{Value, json};
use storykeeper_core::{
  event::{Event, EventPatch, NewEvent},
  services::EventService,
};

use crate::{
  AppState, AppStore,
  error::ApiError,
  identity::Caller,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub world_id: i64,
}

/// `GET /api/events?worldId=<id>`
pub async fn list<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Event>>, ApiError> {
  let events = EventService::new(state.store.as_ref())
    .list(&caller, params.world_id)
    .await?;
  Ok(Json(events))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub world_id:    i64,
  pub title:       String,
  pub year:        i32,
  pub description: Option<String>,
}

/// `POST /api/events`
pub async fn create<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewEvent {
    title:       body.title,
    year:        body.year,
    description: body.description,
  };
  let event = EventService::new(state.store.as_ref())
    .create(&caller, body.world_id, input)
    .await?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /api/events/{id}`
pub async fn get_one<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Event>, ApiError> {
  let event = EventService::new(state.store.as_ref()).get(&caller, id).await?;
  Ok(Json(event))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub title:       Option<String>,
  pub year:        Option<i32>,
  pub description: Option<String>,
}

/// `PATCH /api/events/{id}`
pub async fn update<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Event>, ApiError> {
  let patch = EventPatch {
    title:       body.title,
    year:        body.year,
    description: body.description,
  };
  let event = EventService::new(state.store.as_ref())
    .update(&caller, id, patch)
    .await?;
  Ok(Json(event))
}

/// `DELETE /api/events/{id}`
pub async fn delete<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
  EventService::new(state.store.as_ref()).delete(&caller, id).await?;
  Ok(Json(json!({ "message": "Event deleted successfully" })))
}

/// `POST /api/events/{id}/figures/{figure_id}`
pub async fn link<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path((id, figure_id)): Path<(i64, i64)>,
) -> Result<Json<Event>, ApiError> {
  let event = EventService::new(state.store.as_ref())
    .link_figure(&caller, id, figure_id)
    .await?;
  Ok(Json(event))
}

/// `DELETE /api/events/{id}/figures/{figure_id}`
pub async fn unlink<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path((id, figure_id)): Path<(i64, i64)>,
) -> Result<Json<Event>, ApiError> {
  let event = EventService::new(state.store.as_ref())
    .unlink_figure(&caller, id, figure_id)
    .await?;
  Ok(Json(event))
}
