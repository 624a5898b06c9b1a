//! The password hashing capability.
//!
//! The algorithm is pluggable; `storykeeper-auth` ships an argon2
//! implementation.

use crate::Result;

/// One-way salted password hashing.
pub trait PasswordHasher: Send + Sync {
  /// Hash `plaintext` into a self-describing hash string.
  fn hash(&self, plaintext: &str) -> Result<String>;

  /// Whether `plaintext` matches `hash`. A malformed hash is a mismatch.
  fn verify(&self, plaintext: &str, hash: &str) -> bool;

  /// A valid hash of no real password. Verifying against it costs the same
  /// as a real check, so an unknown email and a wrong password take equally
  /// long to reject.
  fn decoy_hash(&self) -> &str;
}
