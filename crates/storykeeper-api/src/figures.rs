//! Handlers for `/api/figures` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/api/figures?worldId=..` | Optional `search`, `page` (1-based), `limit` |
//! | `POST`   | `/api/figures` | Body: `{"worldId":..,"name":..,"type":..,"description"?:..}` |
//! | `GET`    | `/api/figures/{id}` | |
//! | `PATCH`  | `/api/figures/{id}` | Only present fields change |
//! | `DELETE` | `/api/figures/{id}` | |
//! | `POST`   | `/api/figures/{id}/events/{event_id}` | Link; same world only |
//! | `DELETE` | `/api/figures/{id}/events/{event_id}` | Unlink |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use storykeeper_core::{
  figure::{Figure, FigurePatch, FigureQuery, FigureType, NewFigure},
  page::Page,
  services::FigureService,
};

use crate::{
  AppState, AppStore,
  error::ApiError,
  identity::Caller,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  pub world_id: i64,
  pub search:   Option<String>,
  pub page:     Option<i64>,
  pub limit:    Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigurePage {
  pub figures:     Vec<Figure>,
  pub total:       u64,
  pub page:        u32,
  pub limit:       u32,
  pub total_pages: u64,
}

impl From<Page<Figure>> for FigurePage {
  fn from(page: Page<Figure>) -> Self {
    Self {
      figures:     page.items,
      total:       page.total,
      page:        page.page,
      limit:       page.limit,
      total_pages: page.total_pages,
    }
  }
}

/// `GET /api/figures?worldId=<id>[&search=..][&page=..][&limit=..]`
pub async fn list<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<FigurePage>, ApiError> {
  let query = FigureQuery {
    search: params.search,
    page:   params.page,
    limit:  params.limit,
  };
  let page = FigureService::new(state.store.as_ref())
    .list(&caller, params.world_id, query)
    .await?;
  Ok(Json(page.into()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBody {
  pub world_id:    i64,
  pub name:        String,
  #[serde(rename = "type")]
  pub kind:        String,
  pub description: Option<String>,
}

/// `POST /api/figures`
pub async fn create<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let input = NewFigure {
    name:        body.name,
    kind:        body.kind.parse::<FigureType>()?,
    description: body.description,
  };
  let figure = FigureService::new(state.store.as_ref())
    .create(&caller, body.world_id, input)
    .await?;
  Ok((StatusCode::CREATED, Json(figure)))
}

// ─── Get / update / delete ────────────────────────────────────────────────────

/// `GET /api/figures/{id}`
pub async fn get_one<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Figure>, ApiError> {
  let figure = FigureService::new(state.store.as_ref()).get(&caller, id).await?;
  Ok(Json(figure))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub name:        Option<String>,
  #[serde(rename = "type")]
  pub kind:        Option<String>,
  pub description: Option<String>,
}

/// `PATCH /api/figures/{id}`
pub async fn update<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Figure>, ApiError> {
  let patch = FigurePatch {
    name:        body.name,
    kind:        body.kind.map(|k| k.parse::<FigureType>()).transpose()?,
    description: body.description,
  };
  let figure = FigureService::new(state.store.as_ref())
    .update(&caller, id, patch)
    .await?;
  Ok(Json(figure))
}

/// `DELETE /api/figures/{id}`
pub async fn delete<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
  FigureService::new(state.store.as_ref()).delete(&caller, id).await?;
  Ok(Json(json!({ "message": "Figure deleted successfully" })))
}

// ─── Links ────────────────────────────────────────────────────────────────────

/// `POST /api/figures/{id}/events/{event_id}`
pub async fn link<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path((id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Figure>, ApiError> {
  let figure = FigureService::new(state.store.as_ref())
    .link_event(&caller, id, event_id)
    .await?;
  Ok(Json(figure))
}

/// `DELETE /api/figures/{id}/events/{event_id}`
pub async fn unlink<S: AppStore>(
  Caller(caller): Caller,
  State(state): State<AppState<S>>,
  Path((id, event_id)): Path<(i64, i64)>,
) -> Result<Json<Figure>, ApiError> {
  let figure = FigureService::new(state.store.as_ref())
    .unlink_event(&caller, id, event_id)
    .await?;
  Ok(Json(figure))
}
