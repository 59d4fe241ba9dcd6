//! User — an account on either side of the marketplace.
//!
//! A user holds only identity metadata plus the credential hash. Which side
//! of the market they act on is fixed at registration by [`Role`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The side of the marketplace an account acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  /// Requests home services and owns the jobs they create.
  Client,
  /// Accepts pending jobs and carries them to completion.
  Provider,
}

/// A registered account.
///
/// `password_hash` is an argon2 PHC string; it is never serialised outward,
/// which is also why this type is serialise-only.
#[derive(Debug, Clone, Serialize)]
pub struct User {
  pub user_id:    Uuid,
  pub name:       String,
  pub email:      String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub role:       Role,
  pub created_at: DateTime<Utc>,
}

/// Input to [`crate::store::MarketStore::create_user`].
/// `user_id` and `created_at` are always set by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

/// The slice of a client's account attached to job listings shown to
/// providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
  pub name:  String,
  pub email: String,
}
