//! Registration and login.

use storykeeper_core::{
  Error, Result,
  identity::{Identity, NewIdentity},
  password::PasswordHasher,
  store::CredentialStore,
};

use crate::token::TokenService;

/// Registration and login over a [`CredentialStore`].
///
/// Both flows return a freshly issued bearer token. Login failures are
/// always [`Error::InvalidCredentials`], whether the email is unknown or the
/// password is wrong.
pub struct AuthService<'s, S, H> {
  store:  &'s S,
  hasher: &'s H,
  tokens: &'s TokenService,
}

impl<'s, S, H> AuthService<'s, S, H>
where
  S: CredentialStore,
  H: PasswordHasher,
{
  pub fn new(store: &'s S, hasher: &'s H, tokens: &'s TokenService) -> Self {
    Self { store, hasher, tokens }
  }

  /// Create an identity and return a token for it.
  pub async fn register(&self, email: &str, password: &str) -> Result<String> {
    check_email(email)?;
    if password.is_empty() {
      return Err(Error::InvalidInput("password is required".into()));
    }

    // The secret is checked before anything is persisted.
    if !self.tokens.is_configured() {
      return Err(Error::ConfigurationMissing);
    }

    if self.store.identity_exists(email).await.map_err(Error::store)? {
      return Err(Error::DuplicateIdentity);
    }

    let password_hash = self.hasher.hash(password)?;
    let identity = self
      .store
      .insert_identity(NewIdentity { email: email.to_owned(), password_hash })
      .await
      .map_err(Error::store)?
      .ok_or(Error::DuplicateIdentity)?;

    tracing::info!(identity_id = identity.id, "identity registered");
    self.tokens.issue(identity.id, &identity.email)
  }

  /// Check credentials and return a token.
  pub async fn login(&self, email: &str, password: &str) -> Result<String> {
    let identity = self
      .store
      .find_identity_by_email(email)
      .await
      .map_err(Error::store)?;

    let Some(identity) = identity else {
      // Only spends the time a real verification would; the outcome is moot.
      let _ = self.hasher.verify(password, self.hasher.decoy_hash());
      return Err(Error::InvalidCredentials);
    };

    if !self.hasher.verify(password, &identity.password_hash) {
      return Err(Error::InvalidCredentials);
    }

    tracing::info!(identity_id = identity.id, "identity logged in");
    self.tokens.issue(identity.id, &identity.email)
  }

  /// Resolve a bearer token to its stored identity.
  ///
  /// Never fails: an invalid token, an unknown email or a store error all
  /// yield `None`. The email claim is looked up as-is; the subject claim is
  /// not re-checked against it.
  pub async fn identity_for_token(&self, token: &str) -> Option<Identity> {
    if !self.tokens.verify(token) {
      tracing::debug!("bearer token rejected");
      return None;
    }
    let email = match self.tokens.extract_email(token) {
      Ok(email) => email,
      Err(e) => {
        tracing::debug!(error = %e, "bearer token carries no usable email");
        return None;
      }
    };
    match self.store.find_identity_by_email(&email).await {
      Ok(Some(identity)) => Some(identity),
      Ok(None) => {
        tracing::debug!("bearer token names an unknown identity");
        None
      }
      Err(e) => {
        tracing::debug!(error = %e, "identity lookup failed");
        None
      }
    }
  }
}

fn check_email(email: &str) -> Result<()> {
  let trimmed = email.trim();
  if trimmed.is_empty() || !trimmed.contains('@') || trimmed.len() > 255 {
    return Err(Error::InvalidInput("a valid email is required".into()));
  }
  Ok(())
}
