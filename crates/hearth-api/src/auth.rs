//! Bearer-token verification, token issuance, and password hashing.
//!
//! Verification is a pure check: it extracts `{subject_id, role}` from a
//! signed token and never consults the store. Role sufficiency is the
//! handlers' job, via [`Claim::authorize`].

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
  password_hash::SaltString,
};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use chrono::Utc;
use hearth_core::{claim::Claim, store::MarketStore, user::{Role, User}};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Token lifetime: one hour from issuance.
const TOKEN_TTL_SECS: i64 = 3600;

/// Signing material for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// HMAC secret for HS256 signing and verification.
  pub secret: String,
}

// ─── Tokens ──────────────────────────────────────────────────────────────────

/// The claims carried inside a signed token.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
  /// Subject — the authenticated account's id.
  sub:  Uuid,
  role: Role,
  iat:  i64,
  exp:  i64,
}

/// Sign a credential for `user`, valid for [`TOKEN_TTL_SECS`].
pub fn issue_token(
  user: &User,
  config: &AuthConfig,
) -> Result<String, ApiError> {
  let now = Utc::now().timestamp();
  let claims = TokenClaims {
    sub:  user.user_id,
    role: user.role,
    iat:  now,
    exp:  now + TOKEN_TTL_SECS,
  };

  encode(
    &Header::new(Algorithm::HS256),
    &claims,
    &EncodingKey::from_secret(config.secret.as_bytes()),
  )
  .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Verify a raw token and extract the identity claim it carries.
///
/// Malformed tokens, bad signatures, and expired tokens are all reported
/// identically as [`ApiError::Unauthenticated`].
pub fn verify_token(
  token: &str,
  config: &AuthConfig,
) -> Result<Claim, ApiError> {
  let data = decode::<TokenClaims>(
    token,
    &DecodingKey::from_secret(config.secret.as_bytes()),
    &Validation::new(Algorithm::HS256),
  )
  .map_err(|_| ApiError::Unauthenticated)?;

  Ok(Claim {
    subject_id: data.claims.sub,
    role:       data.claims.role,
  })
}

/// Verify the `Authorization: Bearer <token>` header of a request.
pub fn verify_auth(
  headers: &HeaderMap,
  config: &AuthConfig,
) -> Result<Claim, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthenticated)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthenticated)?;

  verify_token(token, config)
}

/// Extractor: present in a handler means the request carried a valid
/// credential; the wrapped [`Claim`] is passed on explicitly from there.
pub struct Identity(pub Claim);

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: MarketStore + Clone + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let claim = verify_auth(&parts.headers, &state.auth)?;
    Ok(Identity(claim))
  }
}

// ─── Passwords ───────────────────────────────────────────────────────────────

/// Hash a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| ApiError::Internal(e.to_string()))
}

/// Check a password against a stored PHC string.
pub fn verify_password(password: &str, hash: &str) -> bool {
  PasswordHash::new(hash)
    .and_then(|parsed| {
      Argon2::default().verify_password(password.as_bytes(), &parsed)
    })
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::{path::PathBuf, sync::Arc};

  use axum::http::{Request, header};
  use hearth_core::{
    job::{Job, JobPatch, JobStatus, JobWithClient, NewJob},
    user::NewUser,
  };

  use crate::ServerConfig;

  // A minimal no-op store for testing auth only.
  #[derive(Clone)]
  struct NoopStore;

  impl MarketStore for NoopStore {
    type Error = std::convert::Infallible;
    async fn create_user(&self, _: NewUser) -> Result<User, Self::Error> { unimplemented!() }
    async fn get_user(&self, _: Uuid) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn find_user_by_email(&self, _: &str) -> Result<Option<User>, Self::Error> { unimplemented!() }
    async fn list_users(&self) -> Result<Vec<User>, Self::Error> { unimplemented!() }
    async fn create_job(&self, _: NewJob) -> Result<Job, Self::Error> { unimplemented!() }
    async fn get_job(&self, _: Uuid) -> Result<Option<Job>, Self::Error> { unimplemented!() }
    async fn list_jobs_by_client(&self, _: Uuid) -> Result<Vec<Job>, Self::Error> { unimplemented!() }
    async fn list_jobs_by_status(&self, _: JobStatus) -> Result<Vec<JobWithClient>, Self::Error> { unimplemented!() }
    async fn list_jobs_by_provider(&self, _: Uuid) -> Result<Vec<JobWithClient>, Self::Error> { unimplemented!() }
    async fn accept_job(&self, _: Uuid, _: Uuid) -> Result<Job, Self::Error> { unimplemented!() }
    async fn update_job_status(&self, _: Uuid, _: Uuid, _: JobStatus) -> Result<Job, Self::Error> { unimplemented!() }
    async fn update_job_details(&self, _: Uuid, _: Uuid, _: JobPatch) -> Result<Job, Self::Error> { unimplemented!() }
    async fn cancel_job(&self, _: Uuid, _: Uuid) -> Result<Job, Self::Error> { unimplemented!() }
  }

  fn make_state(secret: &str) -> AppState<NoopStore> {
    AppState {
      store:  Arc::new(NoopStore),
      config: Arc::new(ServerConfig {
        host:       "127.0.0.1".to_string(),
        port:       3001,
        store_path: PathBuf::from(":memory:"),
        jwt_secret: secret.to_string(),
      }),
      auth:   Arc::new(AuthConfig { secret: secret.to_string() }),
    }
  }

  fn sample_user(role: Role) -> User {
    User {
      user_id:       Uuid::new_v4(),
      name:          "Alice".into(),
      email:         "alice@example.com".into(),
      password_hash: "unused".into(),
      role,
      created_at:    Utc::now(),
    }
  }

  async fn extract(
    req: Request<axum::body::Body>,
    state: &AppState<NoopStore>,
  ) -> Result<Identity, ApiError> {
    let (mut parts, _) = req.into_parts();
    Identity::from_request_parts(&mut parts, state).await
  }

  #[test]
  fn token_roundtrip_preserves_claim() {
    let config = AuthConfig { secret: "secret".into() };
    let user = sample_user(Role::Provider);

    let token = issue_token(&user, &config).unwrap();
    let claim = verify_token(&token, &config).unwrap();

    assert_eq!(claim.subject_id, user.user_id);
    assert_eq!(claim.role, Role::Provider);
  }

  #[test]
  fn expired_token_is_unauthenticated() {
    let config = AuthConfig { secret: "secret".into() };
    let now = Utc::now().timestamp();
    // Expired well past the verifier's clock-skew leeway.
    let claims = TokenClaims {
      sub:  Uuid::new_v4(),
      role: Role::Client,
      iat:  now - 7200,
      exp:  now - 3600,
    };
    let token = encode(
      &Header::new(Algorithm::HS256),
      &claims,
      &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    assert!(matches!(
      verify_token(&token, &config),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn token_signed_with_other_secret_is_unauthenticated() {
    let signer = AuthConfig { secret: "secret-one".into() };
    let verifier = AuthConfig { secret: "secret-two".into() };
    let token = issue_token(&sample_user(Role::Client), &signer).unwrap();

    assert!(matches!(
      verify_token(&token, &verifier),
      Err(ApiError::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn extractor_accepts_bearer_credential() {
    let state = make_state("secret");
    let user = sample_user(Role::Client);
    let token = issue_token(&user, &state.auth).unwrap();

    let req = Request::builder()
      .header(header::AUTHORIZATION, format!("Bearer {token}"))
      .body(axum::body::Body::empty())
      .unwrap();

    let Identity(claim) = extract(req, &state).await.unwrap();
    assert_eq!(claim.subject_id, user.user_id);
    assert_eq!(claim.role, Role::Client);
  }

  #[tokio::test]
  async fn missing_header_is_rejected() {
    let state = make_state("secret");
    let req = Request::builder().body(axum::body::Body::empty()).unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthenticated)
    ));
  }

  #[tokio::test]
  async fn non_bearer_scheme_is_rejected() {
    let state = make_state("secret");
    let req = Request::builder()
      .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
      .body(axum::body::Body::empty())
      .unwrap();
    assert!(matches!(
      extract(req, &state).await,
      Err(ApiError::Unauthenticated)
    ));
  }

  #[test]
  fn password_hash_roundtrip() {
    let hash = hash_password("hunter2").unwrap();
    assert!(verify_password("hunter2", &hash));
    assert!(!verify_password("hunter3", &hash));
  }
}
