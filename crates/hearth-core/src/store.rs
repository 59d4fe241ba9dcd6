//! The `MarketStore` trait — the contract between the job lifecycle and its
//! storage backend.
//!
//! The trait is implemented by storage backends (e.g. `hearth-store-sqlite`).
//! The HTTP layer (`hearth-api`) depends on this abstraction, not on any
//! concrete backend.
//!
//! Every mutating job operation is read-modify-write with no server-side
//! transaction: the backend fetches the record, validates preconditions
//! against that snapshot, then writes. Because two requests can interleave
//! between the read and the write, the write itself MUST be conditional on
//! the expected pre-state (e.g. `status = pending`) — a blind overwrite would
//! let two providers accept the same job. When the conditional write matches
//! zero rows the operation fails, never silently succeeds.

use std::future::Future;

use uuid::Uuid;

use crate::{
  job::{Job, JobPatch, JobStatus, JobWithClient, NewJob},
  user::{NewUser, User},
};

/// Abstraction over a Hearth marketplace backend.
///
/// All list operations return results ordered by `created_at` descending
/// (newest first).
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). The error type
/// must fold into [`crate::Error`] so callers can discriminate domain
/// failures (not found, access denied, invalid state) from backend failures.
pub trait MarketStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new account. The id and creation timestamp are
  /// set by the store. The email column is unique; a duplicate is a backend
  /// error (callers check for an existing account first).
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look up an account by email (login path). Returns `None` if not found.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// List all accounts.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Jobs — creation and reads ─────────────────────────────────────────

  /// Validate the category/type pairing and persist a new job with
  /// `status = Pending`, no provider, and store-assigned id and timestamps.
  fn create_job(
    &self,
    input: NewJob,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Retrieve a job by id. Returns `None` if not found.
  fn get_job(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Job>, Self::Error>> + Send + '_;

  /// All jobs created by `client_id`, newest first.
  fn list_jobs_by_client(
    &self,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Job>, Self::Error>> + Send + '_;

  /// All jobs with the given status, newest first, each with a summary of
  /// the posting client attached. Providers browse the `Pending` slice.
  fn list_jobs_by_status(
    &self,
    status: JobStatus,
  ) -> impl Future<Output = Result<Vec<JobWithClient>, Self::Error>> + Send + '_;

  /// All jobs bound to `provider_id`, newest first, with client summaries.
  fn list_jobs_by_provider(
    &self,
    provider_id: Uuid,
  ) -> impl Future<Output = Result<Vec<JobWithClient>, Self::Error>> + Send + '_;

  // ── Jobs — lifecycle mutations ────────────────────────────────────────

  /// Pending → InProgress, binding `provider_id` to the job.
  ///
  /// Fails with `JobNotFound` if the job is absent and `NotPending` if it has
  /// already been accepted or reached a terminal state. When two providers
  /// race for the same pending job, the conditional write guarantees exactly
  /// one of them wins; the loser gets `NotPending`.
  fn accept_job(
    &self,
    job_id: Uuid,
    provider_id: Uuid,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Advance status on behalf of the bound provider.
  ///
  /// The only transition a provider may drive this way is
  /// InProgress → Completed. A requested `Cancelled` fails with
  /// `InvalidStatus`; any other pairing (including no-ops and attempts to
  /// move a job back to Pending) fails with `InvalidTransition`. Fails with
  /// `AccessDenied` unless `provider_id` is the job's bound provider.
  fn update_job_status(
    &self,
    job_id: Uuid,
    provider_id: Uuid,
    status: JobStatus,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Apply a client's partial edit to a job that is still Pending.
  ///
  /// Fails with `AccessDenied` unless `client_id` owns the job, `NotPending`
  /// once the job has left Pending, and `InvalidSelection` if the resulting
  /// category/type pair is outside the fixed table.
  fn update_job_details(
    &self,
    job_id: Uuid,
    client_id: Uuid,
    patch: JobPatch,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;

  /// Pending → Cancelled by the owning client.
  ///
  /// Fails with `AccessDenied` unless `client_id` owns the job and
  /// `NotPending` once the job has left Pending (a job a provider is already
  /// working on cannot be cancelled out from under them).
  fn cancel_job(
    &self,
    job_id: Uuid,
    client_id: Uuid,
  ) -> impl Future<Output = Result<Job, Self::Error>> + Send + '_;
}
