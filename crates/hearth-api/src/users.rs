//! Handlers for `/api/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/api/users/register` | Body: [`RegisterBody`]; 201 |
//! | `POST` | `/api/users/login` | Body: [`LoginBody`]; returns a bearer token |
//! | `GET`  | `/api/users` | All accounts, hashes omitted |
//!
//! Registration and login are the only unauthenticated endpoints; they are
//! where credentials come from.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use hearth_core::{
  store::MarketStore,
  user::{NewUser, Role, User},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  auth::{hash_password, issue_token, verify_password},
  error::ApiError,
};

// ─── Register ─────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/users/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  pub role:     Role,
}

/// `POST /api/users/register` — returns 201 + the stored account.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  let existing = state
    .store
    .find_user_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?;
  if existing.is_some() {
    return Err(ApiError::BadRequest("user already exists".into()));
  }

  let user = state
    .store
    .create_user(NewUser {
      name:          body.name,
      email:         body.email,
      password_hash: hash_password(&body.password)?,
      role:          body.role,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(user)))
}

// ─── Login ────────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    String,
  pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:   String,
  pub user_id: Uuid,
  pub role:    Role,
  pub name:    String,
}

/// `POST /api/users/login` — verify the password and issue a bearer token.
///
/// Unknown email and wrong password are deliberately indistinguishable.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  let user = state
    .store
    .find_user_by_email(&body.email)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::BadRequest("invalid credentials".into()))?;

  if !verify_password(&body.password, &user.password_hash) {
    return Err(ApiError::BadRequest("invalid credentials".into()));
  }

  let token = issue_token(&user, &state.auth)?;
  Ok(Json(LoginResponse {
    token,
    user_id: user.user_id,
    role:    user.role,
    name:    user.name,
  }))
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/users` — password hashes are skipped at serialisation.
pub async fn list<S>(
  State(state): State<AppState<S>>,
) -> Result<Json<Vec<User>>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  let users = state.store.list_users().await.map_err(ApiError::from_store)?;
  Ok(Json(users))
}
