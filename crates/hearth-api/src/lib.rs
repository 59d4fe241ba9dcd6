//! JSON REST API for the Hearth marketplace.
//!
//! Exposes an axum [`Router`] backed by any [`hearth_core::store::MarketStore`].
//! Credential verification happens in the [`auth::Identity`] extractor; role
//! and ownership checks happen in the handlers, which pass the verified
//! [`hearth_core::claim::Claim`] into every store call.

pub mod auth;
pub mod error;
pub mod jobs;
pub mod users;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Json, Router,
  routing::{get, post, put},
};
use chrono::Utc;
use hearth_core::store::MarketStore;
use serde::Deserialize;
use serde_json::json;

use auth::AuthConfig;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// HMAC secret for bearer-token signing. Keep it out of version control.
  pub jwt_secret: String,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: MarketStore> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Jobs
    .route("/api/jobs", post(jobs::create::<S>))
    .route("/api/jobs/client/{client_id}", get(jobs::list_by_client::<S>))
    .route("/api/jobs/available", get(jobs::list_available::<S>))
    .route("/api/jobs/accept/{job_id}", put(jobs::accept::<S>))
    .route("/api/jobs/provider/my-jobs", get(jobs::provider_jobs::<S>))
    .route("/api/jobs/update/{job_id}", put(jobs::update_status::<S>))
    .route(
      "/api/jobs/client/update/{job_id}",
      put(jobs::update_details::<S>),
    )
    .route(
      "/api/jobs/client/cancel/{job_id}",
      put(jobs::cancel::<S>),
    )
    // Users
    .route("/api/users/register", post(users::register::<S>))
    .route("/api/users/login", post(users::login::<S>))
    .route("/api/users", get(users::list::<S>))
    // Liveness
    .route("/api/health", get(health))
    .with_state(state)
}

/// `GET /api/health`
async fn health() -> Json<serde_json::Value> {
  Json(json!({ "status": "ok", "timestamp": Utc::now() }))
}
