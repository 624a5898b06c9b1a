//! Handlers for registration, login and the current identity.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/register` | Body: `{"email":..,"password":..}`; public |
//! | `POST` | `/api/login`    | Body: `{"email":..,"password":..}`; public |
//! | `GET`  | `/api/me`       | The authenticated caller |

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storykeeper_auth::AuthService;

use crate::{AppState, AppStore, error::ApiError, identity::Caller};

#[derive(Debug, Deserialize)]
pub struct Credentials {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
  pub token: String,
}

/// `POST /api/register`
pub async fn register<S: AppStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
  let token = AuthService::new(state.store.as_ref(), state.hasher.as_ref(), state.tokens.as_ref())
    .register(&body.email, &body.password)
    .await?;
  Ok(Json(TokenResponse { token }))
}

/// `POST /api/login`
pub async fn login<S: AppStore>(
  State(state): State<AppState<S>>,
  Json(body): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
  let token = AuthService::new(state.store.as_ref(), state.hasher.as_ref(), state.tokens.as_ref())
    .login(&body.email, &body.password)
    .await?;
  Ok(Json(TokenResponse { token }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Me {
  pub id:         i64,
  pub email:      String,
  pub created_at: DateTime<Utc>,
}

/// `GET /api/me`
pub async fn me(Caller(identity): Caller) -> Json<Me> {
  Json(Me {
    id:         identity.id,
    email:      identity.email,
    created_at: identity.created_at,
  })
}
