//! [`SqliteStore`] — the SQLite implementation of [`MarketStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use hearth_core::{
  job::{Job, JobPatch, JobStatus, JobWithClient, NewJob},
  store::MarketStore,
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{
    RawJob, RawJobWithClient, RawUser, encode_category, encode_dt,
    encode_role, encode_service_type, encode_status, encode_uuid,
  },
  schema::SCHEMA,
};

const JOB_COLUMNS: &str = "job_id, client_id, provider_id, category, \
   service_type, description, status, created_at, updated_at";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Hearth marketplace store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch a job row by id, or `None` if absent.
  async fn query_job(&self, job_id: Uuid) -> Result<Option<Job>> {
    let id_str = encode_uuid(job_id);

    let raw: Option<RawJob> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE job_id = ?1"),
              rusqlite::params![id_str],
              RawJob::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawJob::into_job).transpose()
  }

  /// Re-fetch a job that a conditional UPDATE just matched.
  /// The row existed a statement ago and rows are never deleted.
  async fn query_job_expected(&self, job_id: Uuid) -> Result<Job> {
    self.query_job(job_id).await?.ok_or(Error::JobNotFound(job_id))
  }

  /// List jobs joined with the posting client, under an extra filter column.
  async fn query_jobs_with_client(
    &self,
    filter_sql: &'static str,
    filter_value: String,
  ) -> Result<Vec<JobWithClient>> {
    let raws: Vec<RawJobWithClient> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT
             j.job_id, j.client_id, j.provider_id, j.category,
             j.service_type, j.description, j.status, j.created_at,
             j.updated_at,
             u.name, u.email
           FROM jobs j
           JOIN users u ON u.user_id = j.client_id
           WHERE {filter_sql} = ?1
           ORDER BY j.created_at DESC"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![filter_value], |row| {
            Ok(RawJobWithClient {
              job:          RawJob::from_row(row)?,
              client_name:  row.get(9)?,
              client_email: row.get(10)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawJobWithClient::into_job_with_client)
      .collect()
  }
}

// ─── MarketStore impl ────────────────────────────────────────────────────────

impl MarketStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let at_str   = encode_dt(user.created_at);
    let role_str = encode_role(user.role).to_owned();
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, name, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, name, email, hash, role_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, email, password_hash, role, created_at
               FROM users WHERE user_id = ?1",
              rusqlite::params![id_str],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    let email = email.to_owned();

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT user_id, name, email, password_hash, role, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              RawUser::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, name, email, password_hash, role, created_at
           FROM users ORDER BY created_at DESC",
        )?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Jobs — creation and reads ─────────────────────────────────────────────

  async fn create_job(&self, input: NewJob) -> Result<Job> {
    if !input.category.allows(input.service_type) {
      return Err(Error::InvalidSelection {
        category:     input.category,
        service_type: input.service_type,
      });
    }

    let now = Utc::now();
    let job = Job {
      job_id:       Uuid::new_v4(),
      client_id:    input.client_id,
      provider_id:  None,
      category:     input.category,
      service_type: input.service_type,
      description:  input.description,
      status:       JobStatus::Pending,
      created_at:   now,
      updated_at:   now,
    };

    let id_str       = encode_uuid(job.job_id);
    let client_str   = encode_uuid(job.client_id);
    let category_str = encode_category(job.category).to_owned();
    let type_str     = encode_service_type(job.service_type).to_owned();
    let status_str   = encode_status(job.status).to_owned();
    let at_str       = encode_dt(now);
    let description  = job.description.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO jobs (
             job_id, client_id, provider_id, category, service_type,
             description, status, created_at, updated_at
           ) VALUES (?1, ?2, NULL, ?3, ?4, ?5, ?6, ?7, ?7)",
          rusqlite::params![
            id_str,
            client_str,
            category_str,
            type_str,
            description,
            status_str,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(job)
  }

  async fn get_job(&self, id: Uuid) -> Result<Option<Job>> {
    self.query_job(id).await
  }

  async fn list_jobs_by_client(&self, client_id: Uuid) -> Result<Vec<Job>> {
    let client_str = encode_uuid(client_id);

    let raws: Vec<RawJob> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {JOB_COLUMNS} FROM jobs
           WHERE client_id = ?1
           ORDER BY created_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![client_str], RawJob::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawJob::into_job).collect()
  }

  async fn list_jobs_by_status(
    &self,
    status: JobStatus,
  ) -> Result<Vec<JobWithClient>> {
    self
      .query_jobs_with_client("j.status", encode_status(status).to_owned())
      .await
  }

  async fn list_jobs_by_provider(
    &self,
    provider_id: Uuid,
  ) -> Result<Vec<JobWithClient>> {
    self
      .query_jobs_with_client("j.provider_id", encode_uuid(provider_id))
      .await
  }

  // ── Jobs — lifecycle mutations ────────────────────────────────────────────

  async fn accept_job(&self, job_id: Uuid, provider_id: Uuid) -> Result<Job> {
    let id_str       = encode_uuid(job_id);
    let provider_str = encode_uuid(provider_id);
    let now_str      = encode_dt(Utc::now());

    // Compare-and-swap on the pre-state: of any number of racing accepts,
    // exactly one UPDATE matches the pending row.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs
           SET status = 'in_progress', provider_id = ?2, updated_at = ?3
           WHERE job_id = ?1 AND status = 'pending'",
          rusqlite::params![id_str, provider_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return match self.query_job(job_id).await? {
        None => Err(Error::JobNotFound(job_id)),
        Some(_) => Err(Error::NotPending(job_id)),
      };
    }

    self.query_job_expected(job_id).await
  }

  async fn update_job_status(
    &self,
    job_id: Uuid,
    provider_id: Uuid,
    status: JobStatus,
  ) -> Result<Job> {
    // Cancellation belongs to the owning client, not to this endpoint.
    if status == JobStatus::Cancelled {
      return Err(Error::InvalidStatus(status));
    }

    let job = self
      .query_job(job_id)
      .await?
      .ok_or(Error::JobNotFound(job_id))?;

    if job.provider_id != Some(provider_id) {
      return Err(Error::AccessDenied);
    }

    // The only provider-driven edge is InProgress -> Completed. Everything
    // else (no-ops, reverting to Pending) is an illegal transition.
    if status != JobStatus::Completed || !job.status.can_transition_to(status)
    {
      return Err(Error::InvalidTransition(job_id, job.status, status));
    }

    let id_str       = encode_uuid(job_id);
    let provider_str = encode_uuid(provider_id);
    let now_str      = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs
           SET status = 'completed', updated_at = ?3
           WHERE job_id = ?1 AND provider_id = ?2 AND status = 'in_progress'",
          rusqlite::params![id_str, provider_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      // Lost a race with another mutation; report against the fresh state.
      let fresh = self.query_job_expected(job_id).await?;
      return Err(Error::InvalidTransition(job_id, fresh.status, status));
    }

    self.query_job_expected(job_id).await
  }

  async fn update_job_details(
    &self,
    job_id: Uuid,
    client_id: Uuid,
    patch: JobPatch,
  ) -> Result<Job> {
    let job = self
      .query_job(job_id)
      .await?
      .ok_or(Error::JobNotFound(job_id))?;

    if job.client_id != client_id {
      return Err(Error::AccessDenied);
    }
    if job.status != JobStatus::Pending {
      return Err(Error::NotPending(job_id));
    }

    // Resolve the patch against the snapshot; the resulting pair must still
    // be in the fixed table.
    let category = patch.category.unwrap_or(job.category);
    let service_type = patch.service_type.unwrap_or(job.service_type);
    if !category.allows(service_type) {
      return Err(Error::InvalidSelection { category, service_type });
    }
    let description = patch.description.or(job.description);

    let id_str       = encode_uuid(job_id);
    let client_str   = encode_uuid(client_id);
    let category_str = encode_category(category).to_owned();
    let type_str     = encode_service_type(service_type).to_owned();
    let now_str      = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs
           SET category = ?3, service_type = ?4, description = ?5,
               updated_at = ?6
           WHERE job_id = ?1 AND client_id = ?2 AND status = 'pending'",
          rusqlite::params![
            id_str,
            client_str,
            category_str,
            type_str,
            description,
            now_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      // A provider accepted (or the client cancelled) between our read and
      // write; the snapshot preconditions no longer hold.
      return Err(Error::NotPending(job_id));
    }

    self.query_job_expected(job_id).await
  }

  async fn cancel_job(&self, job_id: Uuid, client_id: Uuid) -> Result<Job> {
    let job = self
      .query_job(job_id)
      .await?
      .ok_or(Error::JobNotFound(job_id))?;

    if job.client_id != client_id {
      return Err(Error::AccessDenied);
    }
    if !job.status.can_transition_to(JobStatus::Cancelled) {
      return Err(Error::NotPending(job_id));
    }

    let id_str     = encode_uuid(job_id);
    let client_str = encode_uuid(client_id);
    let now_str    = encode_dt(Utc::now());

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE jobs
           SET status = 'cancelled', updated_at = ?3
           WHERE job_id = ?1 AND client_id = ?2 AND status = 'pending'",
          rusqlite::params![id_str, client_str, now_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::NotPending(job_id));
    }

    self.query_job_expected(job_id).await
  }
}
