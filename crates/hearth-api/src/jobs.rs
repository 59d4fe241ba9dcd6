//! Handlers for `/api/jobs` endpoints.
//!
//! | Method | Path | Role | Notes |
//! |--------|------|------|-------|
//! | `POST` | `/api/jobs` | any authenticated | Body: [`CreateJobBody`]; 201 + job |
//! | `GET`  | `/api/jobs/client/:client_id` | any authenticated | Clients may only list themselves |
//! | `GET`  | `/api/jobs/available` | provider | Pending jobs, newest first, with client summary |
//! | `PUT`  | `/api/jobs/accept/:job_id` | provider | Pending → InProgress, binds the caller |
//! | `GET`  | `/api/jobs/provider/my-jobs` | provider | The caller's accepted jobs |
//! | `PUT`  | `/api/jobs/update/:job_id` | provider | Body: `{"status":"completed"}` |
//! | `PUT`  | `/api/jobs/client/update/:job_id` | client | Body: [`JobPatch`]; pending jobs only |
//! | `PUT`  | `/api/jobs/client/cancel/:job_id` | client | Pending → Cancelled |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use hearth_core::{
  job::{
    Job, JobPatch, JobStatus, JobWithClient, NewJob, ServiceCategory,
    ServiceType,
  },
  store::MarketStore,
  user::Role,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, auth::Identity, error::ApiError};

// ─── Create ───────────────────────────────────────────────────────────────────

/// JSON body accepted by `POST /api/jobs`.
#[derive(Debug, Deserialize)]
pub struct CreateJobBody {
  pub category:     ServiceCategory,
  #[serde(rename = "type")]
  pub service_type: ServiceType,
  pub description:  Option<String>,
}

/// `POST /api/jobs` — returns 201 + the stored [`Job`].
/// The job is owned by the caller regardless of role.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Json(body): Json<CreateJobBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[])?;

  let job = state
    .store
    .create_job(NewJob {
      client_id:    claim.subject_id,
      category:     body.category,
      service_type: body.service_type,
      description:  body.description,
    })
    .await
    .map_err(ApiError::from_store)?;

  Ok((StatusCode::CREATED, Json(job)))
}

// ─── Client listing ───────────────────────────────────────────────────────────

/// `GET /api/jobs/client/:client_id`
///
/// A client may only list their own jobs; providers may inspect any client's.
pub async fn list_by_client<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Path(client_id): Path<Uuid>,
) -> Result<Json<Vec<Job>>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[])?;

  if claim.role == Role::Client && claim.subject_id != client_id {
    return Err(ApiError::Forbidden("access denied".into()));
  }

  let jobs = state
    .store
    .list_jobs_by_client(client_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(jobs))
}

// ─── Provider listings ────────────────────────────────────────────────────────

/// `GET /api/jobs/available` — all pending jobs open for acceptance.
pub async fn list_available<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
) -> Result<Json<Vec<JobWithClient>>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Provider])?;

  let jobs = state
    .store
    .list_jobs_by_status(JobStatus::Pending)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(jobs))
}

/// `GET /api/jobs/provider/my-jobs` — the jobs bound to the caller.
pub async fn provider_jobs<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
) -> Result<Json<Vec<JobWithClient>>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Provider])?;

  let jobs = state
    .store
    .list_jobs_by_provider(claim.subject_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(jobs))
}

// ─── Accept ───────────────────────────────────────────────────────────────────

/// `PUT /api/jobs/accept/:job_id` — Pending → InProgress, binding the caller
/// as the job's provider. Exactly one of any number of racing accepts wins.
pub async fn accept<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Provider])?;

  let job = state
    .store
    .accept_job(job_id, claim.subject_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

// ─── Status update ────────────────────────────────────────────────────────────

/// JSON body accepted by `PUT /api/jobs/update/:job_id`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusBody {
  pub status: JobStatus,
}

/// `PUT /api/jobs/update/:job_id` — the bound provider advances the job.
/// The only legal request is `{"status":"completed"}` on an in-progress job.
pub async fn update_status<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Path(job_id): Path<Uuid>,
  Json(body): Json<UpdateStatusBody>,
) -> Result<Json<Job>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Provider])?;

  let job = state
    .store
    .update_job_status(job_id, claim.subject_id, body.status)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

// ─── Client edit ──────────────────────────────────────────────────────────────

/// `PUT /api/jobs/client/update/:job_id` — body is a [`JobPatch`]; only the
/// owning client, and only while the job is still pending.
pub async fn update_details<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Path(job_id): Path<Uuid>,
  Json(patch): Json<JobPatch>,
) -> Result<Json<Job>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Client])?;

  let job = state
    .store
    .update_job_details(job_id, claim.subject_id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}

// ─── Cancel ───────────────────────────────────────────────────────────────────

/// `PUT /api/jobs/client/cancel/:job_id` — Pending → Cancelled by the owner.
pub async fn cancel<S>(
  State(state): State<AppState<S>>,
  Identity(claim): Identity,
  Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, ApiError>
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  claim.authorize(&[Role::Client])?;

  let job = state
    .store
    .cancel_job(job_id, claim.subject_id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(job))
}
