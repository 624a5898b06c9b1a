//! Stateless, signed, time-bounded identity tokens (HS256 JWT).
//!
//! A token is valid until it expires; there is no revocation list and tokens
//! are never re-checked against account state.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use storykeeper_core::{Error, Result};

/// Tokens expire this long after issuance.
pub const TOKEN_LIFETIME: Duration = Duration::days(7);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  sub:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  email: Option<String>,
  iat:   i64,
  exp:   i64,
}

/// Issues and verifies bearer tokens with a symmetric signing secret.
pub struct TokenService {
  secret: Option<String>,
}

impl TokenService {
  /// An empty secret counts as missing.
  pub fn new(secret: Option<String>) -> Self {
    Self { secret: secret.filter(|s| !s.is_empty()) }
  }

  pub fn is_configured(&self) -> bool { self.secret.is_some() }

  fn secret(&self) -> Result<&[u8]> {
    self
      .secret
      .as_deref()
      .map(str::as_bytes)
      .ok_or(Error::ConfigurationMissing)
  }

  /// Issue a token for `identity_id`, valid for [`TOKEN_LIFETIME`].
  pub fn issue(&self, identity_id: i64, email: &str) -> Result<String> {
    self.issue_at(identity_id, email, Utc::now())
  }

  /// Issue a token as if the current time were `issued_at`.
  pub fn issue_at(
    &self,
    identity_id: i64,
    email: &str,
    issued_at: DateTime<Utc>,
  ) -> Result<String> {
    let key = EncodingKey::from_secret(self.secret()?);
    let claims = Claims {
      sub:   Some(identity_id.to_string()),
      email: Some(email.to_owned()),
      iat:   issued_at.timestamp(),
      exp:   (issued_at + TOKEN_LIFETIME).timestamp(),
    };
    encode(&Header::new(Algorithm::HS256), &claims, &key)
      .map_err(|e| Error::TokenParse(format!("failed to sign token: {e}")))
  }

  /// Whether `token` is well-formed, correctly signed and unexpired.
  ///
  /// Total: any failure, including a missing secret, is `false`.
  pub fn verify(&self, token: &str) -> bool { self.verify_at(token, Utc::now()) }

  pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> bool {
    self.decode_at(token, now).is_ok()
  }

  /// The numeric subject of a token. Meant to be called after [`verify`].
  ///
  /// [`verify`]: Self::verify
  pub fn extract_identity_id(&self, token: &str) -> Result<i64> {
    let sub = self
      .decode_at(token, Utc::now())?
      .sub
      .ok_or_else(|| Error::TokenParse("token has no subject".into()))?;
    sub
      .parse()
      .map_err(|_| Error::TokenParse(format!("token subject is not a valid id: {sub:?}")))
  }

  /// The email claim, verbatim.
  pub fn extract_email(&self, token: &str) -> Result<String> {
    self
      .decode_at(token, Utc::now())?
      .email
      .ok_or_else(|| Error::TokenParse("token has no email claim".into()))
  }

  fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims> {
    let key = DecodingKey::from_secret(self.secret()?);

    // Expiry is checked below against `now` with no leeway.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<Claims>(token, &key, &validation)
      .map_err(|e| Error::TokenParse(e.to_string()))?
      .claims;

    if now.timestamp() > claims.exp {
      return Err(Error::TokenParse("token expired".into()));
    }
    Ok(claims)
  }
}
