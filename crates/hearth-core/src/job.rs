//! Job types — the central entity of the marketplace.
//!
//! A job is created by a client, optionally edited while pending, accepted by
//! a provider (which binds the provider to the job), and then either carried
//! to completion by that provider or cancelled by its client. All state
//! changes follow the transition table in [`JobStatus::can_transition_to`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::ClientSummary;

// ─── Service taxonomy ────────────────────────────────────────────────────────

/// Top-level service category. Each category admits a fixed set of
/// [`ServiceType`]s; the pairing is validated on create and on every
/// client-initiated edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
  HomeRepair,
  Cleaning,
  Other,
}

/// Concrete service offered within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
  // ── Home repair ──────────────────────────────────────────────────────────
  Plumbing,
  ElectricalWork,
  ApplianceRepair,

  // ── Cleaning ─────────────────────────────────────────────────────────────
  RegularCleaning,
  DeepCleaning,
  MoveInMoveOutCleaning,
  PostRenovationCleaning,

  // ── Other ────────────────────────────────────────────────────────────────
  GardeningAndLandscaping,
  PetCare,
  ItSupport,
}

impl ServiceCategory {
  /// The fixed set of service types this category admits.
  pub fn allowed_types(self) -> &'static [ServiceType] {
    use ServiceType::*;
    match self {
      Self::HomeRepair => &[Plumbing, ElectricalWork, ApplianceRepair],
      Self::Cleaning => &[
        RegularCleaning,
        DeepCleaning,
        MoveInMoveOutCleaning,
        PostRenovationCleaning,
      ],
      Self::Other => &[GardeningAndLandscaping, PetCare, ItSupport],
    }
  }

  pub fn allows(self, service_type: ServiceType) -> bool {
    self.allowed_types().contains(&service_type)
  }
}

impl fmt::Display for ServiceCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::HomeRepair => "home_repair",
      Self::Cleaning => "cleaning",
      Self::Other => "other",
    };
    f.write_str(s)
  }
}

impl fmt::Display for ServiceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Plumbing => "plumbing",
      Self::ElectricalWork => "electrical_work",
      Self::ApplianceRepair => "appliance_repair",
      Self::RegularCleaning => "regular_cleaning",
      Self::DeepCleaning => "deep_cleaning",
      Self::MoveInMoveOutCleaning => "move_in_move_out_cleaning",
      Self::PostRenovationCleaning => "post_renovation_cleaning",
      Self::GardeningAndLandscaping => "gardening_and_landscaping",
      Self::PetCare => "pet_care",
      Self::ItSupport => "it_support",
    };
    f.write_str(s)
  }
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Lifecycle state of a job. Completed and Cancelled are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
  Pending,
  InProgress,
  Completed,
  Cancelled,
}

impl JobStatus {
  /// The full transition table:
  ///
  /// ```text
  /// Pending ──accept──▶ InProgress ──complete──▶ Completed
  /// Pending ──cancel──▶ Cancelled
  /// ```
  ///
  /// No other edge exists; in particular there is no way back to Pending and
  /// no way out of a terminal state.
  pub fn can_transition_to(self, next: JobStatus) -> bool {
    matches!(
      (self, next),
      (Self::Pending, Self::InProgress)
        | (Self::Pending, Self::Cancelled)
        | (Self::InProgress, Self::Completed)
    )
  }
}

impl fmt::Display for JobStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Self::Pending => "pending",
      Self::InProgress => "in_progress",
      Self::Completed => "completed",
      Self::Cancelled => "cancelled",
    };
    f.write_str(s)
  }
}

// ─── Job ─────────────────────────────────────────────────────────────────────

/// A service request record.
///
/// `job_id`, `client_id`, and `created_at` are immutable after creation.
/// `provider_id` is unset while the job is pending and, once bound by an
/// accept, never changes or clears. `updated_at` is refreshed by the store on
/// every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
  pub job_id:      Uuid,
  pub client_id:   Uuid,
  pub provider_id: Option<Uuid>,
  pub category:    ServiceCategory,
  #[serde(rename = "type")]
  pub service_type: ServiceType,
  pub description: Option<String>,
  pub status:      JobStatus,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

// ─── NewJob ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::MarketStore::create_job`].
/// The id and both timestamps are always set by the store.
#[derive(Debug, Clone)]
pub struct NewJob {
  pub client_id:    Uuid,
  pub category:     ServiceCategory,
  pub service_type: ServiceType,
  pub description:  Option<String>,
}

// ─── JobPatch ────────────────────────────────────────────────────────────────

/// A client-initiated partial edit. Absent fields are left unchanged; the
/// resulting category/type pair must still be in the fixed table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPatch {
  pub category:     Option<ServiceCategory>,
  #[serde(rename = "type")]
  pub service_type: Option<ServiceType>,
  pub description:  Option<String>,
}

// ─── Listing view ────────────────────────────────────────────────────────────

/// A job bundled with a summary of the client who posted it — the shape
/// providers see when browsing or reviewing their accepted work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobWithClient {
  pub job:    Job,
  pub client: ClientSummary,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_table_is_exact() {
    use ServiceType::*;
    assert_eq!(
      ServiceCategory::HomeRepair.allowed_types(),
      &[Plumbing, ElectricalWork, ApplianceRepair]
    );
    assert_eq!(
      ServiceCategory::Cleaning.allowed_types(),
      &[
        RegularCleaning,
        DeepCleaning,
        MoveInMoveOutCleaning,
        PostRenovationCleaning
      ]
    );
    assert_eq!(
      ServiceCategory::Other.allowed_types(),
      &[GardeningAndLandscaping, PetCare, ItSupport]
    );
  }

  #[test]
  fn cross_category_pairs_are_rejected() {
    // Every (category, type) pair outside the table must be refused.
    let categories = [
      ServiceCategory::HomeRepair,
      ServiceCategory::Cleaning,
      ServiceCategory::Other,
    ];
    for category in categories {
      for other in categories.iter().filter(|c| **c != category) {
        for &service_type in other.allowed_types() {
          assert!(!category.allows(service_type), "{category} / {service_type}");
        }
      }
    }
  }

  #[test]
  fn transition_table_is_exact() {
    use JobStatus::*;
    let all = [Pending, InProgress, Completed, Cancelled];
    for from in all {
      for to in all {
        let legal = matches!(
          (from, to),
          (Pending, InProgress) | (Pending, Cancelled) | (InProgress, Completed)
        );
        assert_eq!(from.can_transition_to(to), legal, "{from} -> {to}");
      }
    }
  }

  #[test]
  fn terminal_states_have_no_outgoing_edges() {
    use JobStatus::*;
    for terminal in [Completed, Cancelled] {
      for to in [Pending, InProgress, Completed, Cancelled] {
        assert!(!terminal.can_transition_to(to), "{terminal} -> {to}");
      }
    }
  }
}
