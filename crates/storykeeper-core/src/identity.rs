//! Identity: an authenticated user account.

use std::fmt;

use chrono::{DateTime, Utc};

/// A stored user account.
///
/// The email is unique and compared case-sensitively, exactly as stored.
/// `Debug` never prints the password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
  pub id:            i64,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl fmt::Debug for Identity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Identity")
      .field("id", &self.id)
      .field("email", &self.email)
      .field("password_hash", &"<redacted>")
      .field("created_at", &self.created_at)
      .finish()
  }
}

/// Input for [`CredentialStore::insert_identity`](crate::store::CredentialStore::insert_identity).
/// The password has already been hashed.
#[derive(Clone)]
pub struct NewIdentity {
  pub email:         String,
  pub password_hash: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn debug_redacts_password_hash() {
    let identity = Identity {
      id:            7,
      email:         "a@example.com".into(),
      password_hash: "$argon2id$v=19$secret".into(),
      created_at:    Utc::now(),
    };
    let printed = format!("{identity:?}");
    assert!(printed.contains("a@example.com"));
    assert!(!printed.contains("argon2id"));
  }
}
