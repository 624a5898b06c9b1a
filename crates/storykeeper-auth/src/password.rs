//! Argon2 implementation of [`PasswordHasher`].

use argon2::{
  Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier,
  password_hash::SaltString,
};
use rand_core::OsRng;
use storykeeper_core::{Error, Result, password::PasswordHasher};

/// Salted argon2id hashing producing PHC strings, e.g. `$argon2id$v=19$…`.
pub struct Argon2Hasher {
  decoy: String,
}

impl Argon2Hasher {
  /// Build a hasher. Hashes one throwaway value up front to serve as the
  /// decoy for unknown-account logins.
  pub fn new() -> Result<Self> {
    let decoy = hash_with_fresh_salt("storykeeper-decoy")?;
    Ok(Self { decoy })
  }
}

fn hash_with_fresh_salt(plaintext: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map(|h| h.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

impl PasswordHasher for Argon2Hasher {
  fn hash(&self, plaintext: &str) -> Result<String> { hash_with_fresh_salt(plaintext) }

  fn verify(&self, plaintext: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
      return false;
    };
    Argon2::default()
      .verify_password(plaintext.as_bytes(), &parsed)
      .is_ok()
  }

  fn decoy_hash(&self) -> &str { &self.decoy }
}
