//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings. Enum columns store the same
//! snake_case spellings the serde layer uses on the wire. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use hearth_core::{
  job::{Job, JobStatus, JobWithClient, ServiceCategory, ServiceType},
  user::{ClientSummary, Role, User},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc>
// ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Role ─────────────────────────────────────────────────────────────────────

pub fn encode_role(r: Role) -> &'static str {
  match r {
    Role::Client => "client",
    Role::Provider => "provider",
  }
}

pub fn decode_role(s: &str) -> Result<Role> {
  match s {
    "client" => Ok(Role::Client),
    "provider" => Ok(Role::Provider),
    other => Err(Error::DateParse(format!("unknown role: {other:?}"))),
  }
}

// ─── JobStatus
// ────────────────────────────────────────────────────────────────

pub fn encode_status(s: JobStatus) -> &'static str {
  match s {
    JobStatus::Pending => "pending",
    JobStatus::InProgress => "in_progress",
    JobStatus::Completed => "completed",
    JobStatus::Cancelled => "cancelled",
  }
}

pub fn decode_status(s: &str) -> Result<JobStatus> {
  match s {
    "pending" => Ok(JobStatus::Pending),
    "in_progress" => Ok(JobStatus::InProgress),
    "completed" => Ok(JobStatus::Completed),
    "cancelled" => Ok(JobStatus::Cancelled),
    other => Err(Error::DateParse(format!("unknown job status: {other:?}"))),
  }
}

// ─── ServiceCategory
// ──────────────────────────────────────────────────────────

pub fn encode_category(c: ServiceCategory) -> &'static str {
  match c {
    ServiceCategory::HomeRepair => "home_repair",
    ServiceCategory::Cleaning => "cleaning",
    ServiceCategory::Other => "other",
  }
}

pub fn decode_category(s: &str) -> Result<ServiceCategory> {
  match s {
    "home_repair" => Ok(ServiceCategory::HomeRepair),
    "cleaning" => Ok(ServiceCategory::Cleaning),
    "other" => Ok(ServiceCategory::Other),
    other => Err(Error::DateParse(format!("unknown category: {other:?}"))),
  }
}

// ─── ServiceType
// ──────────────────────────────────────────────────────────────

pub fn encode_service_type(t: ServiceType) -> &'static str {
  match t {
    ServiceType::Plumbing => "plumbing",
    ServiceType::ElectricalWork => "electrical_work",
    ServiceType::ApplianceRepair => "appliance_repair",
    ServiceType::RegularCleaning => "regular_cleaning",
    ServiceType::DeepCleaning => "deep_cleaning",
    ServiceType::MoveInMoveOutCleaning => "move_in_move_out_cleaning",
    ServiceType::PostRenovationCleaning => "post_renovation_cleaning",
    ServiceType::GardeningAndLandscaping => "gardening_and_landscaping",
    ServiceType::PetCare => "pet_care",
    ServiceType::ItSupport => "it_support",
  }
}

pub fn decode_service_type(s: &str) -> Result<ServiceType> {
  match s {
    "plumbing" => Ok(ServiceType::Plumbing),
    "electrical_work" => Ok(ServiceType::ElectricalWork),
    "appliance_repair" => Ok(ServiceType::ApplianceRepair),
    "regular_cleaning" => Ok(ServiceType::RegularCleaning),
    "deep_cleaning" => Ok(ServiceType::DeepCleaning),
    "move_in_move_out_cleaning" => Ok(ServiceType::MoveInMoveOutCleaning),
    "post_renovation_cleaning" => Ok(ServiceType::PostRenovationCleaning),
    "gardening_and_landscaping" => Ok(ServiceType::GardeningAndLandscaping),
    "pet_care" => Ok(ServiceType::PetCare),
    "it_support" => Ok(ServiceType::ItSupport),
    other => {
      Err(Error::DateParse(format!("unknown service type: {other:?}")))
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `jobs` row.
pub struct RawJob {
  pub job_id:       String,
  pub client_id:    String,
  pub provider_id:  Option<String>,
  pub category:     String,
  pub service_type: String,
  pub description:  Option<String>,
  pub status:       String,
  pub created_at:   String,
  pub updated_at:   String,
}

impl RawJob {
  /// Field order matches the `job_id, client_id, provider_id, category,
  /// service_type, description, status, created_at, updated_at` column list.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      job_id:       row.get(0)?,
      client_id:    row.get(1)?,
      provider_id:  row.get(2)?,
      category:     row.get(3)?,
      service_type: row.get(4)?,
      description:  row.get(5)?,
      status:       row.get(6)?,
      created_at:   row.get(7)?,
      updated_at:   row.get(8)?,
    })
  }

  pub fn into_job(self) -> Result<Job> {
    Ok(Job {
      job_id:       decode_uuid(&self.job_id)?,
      client_id:    decode_uuid(&self.client_id)?,
      provider_id:  self.provider_id.as_deref().map(decode_uuid).transpose()?,
      category:     decode_category(&self.category)?,
      service_type: decode_service_type(&self.service_type)?,
      description:  self.description,
      status:       decode_status(&self.status)?,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
    })
  }
}

/// A `jobs` row joined with the posting client's `users` row.
pub struct RawJobWithClient {
  pub job:          RawJob,
  pub client_name:  String,
  pub client_email: String,
}

impl RawJobWithClient {
  pub fn into_job_with_client(self) -> Result<JobWithClient> {
    Ok(JobWithClient {
      job:    self.job.into_job()?,
      client: ClientSummary {
        name:  self.client_name,
        email: self.client_email,
      },
    })
  }
}

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}
