//! Identity claim — the verified identity threaded through every operation.
//!
//! A claim is produced per request by the credential verifier and passed
//! explicitly into handlers and store calls. There is no ambient session
//! state anywhere in the system.

use uuid::Uuid;

use crate::{Error, Result, user::Role};

/// A verified identity: who is calling, and on which side of the market.
/// Lifetime is one request; claims are never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
  pub subject_id: Uuid,
  pub role:       Role,
}

impl Claim {
  /// The role gate: require the claim's role to be one of `required`.
  ///
  /// An empty `required` set admits any authenticated identity. This check
  /// only ever runs after successful credential verification — an
  /// unauthenticated caller fails upstream and never reaches it.
  pub fn authorize(&self, required: &[Role]) -> Result<()> {
    if required.is_empty() || required.contains(&self.role) {
      Ok(())
    } else {
      Err(Error::Forbidden)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn claim(role: Role) -> Claim {
    Claim { subject_id: Uuid::new_v4(), role }
  }

  #[test]
  fn empty_required_set_admits_any_role() {
    assert!(claim(Role::Client).authorize(&[]).is_ok());
    assert!(claim(Role::Provider).authorize(&[]).is_ok());
  }

  #[test]
  fn matching_role_passes() {
    assert!(claim(Role::Provider).authorize(&[Role::Provider]).is_ok());
    assert!(
      claim(Role::Client)
        .authorize(&[Role::Client, Role::Provider])
        .is_ok()
    );
  }

  #[test]
  fn wrong_role_is_forbidden() {
    let err = claim(Role::Client).authorize(&[Role::Provider]).unwrap_err();
    assert!(matches!(err, Error::Forbidden));
  }
}
