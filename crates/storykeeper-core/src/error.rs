//! Error types for `storykeeper-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The resource does not exist, or exists but belongs to someone else.
  /// The two cases are never distinguished.
  #[error("not found")]
  NotFound,

  #[error("year {year} must be between {start_year} and {current_year}")]
  InvalidYear {
    year:         i32,
    start_year:   i32,
    current_year: i32,
  },

  #[error(
    "cannot link figure and event from different worlds: figure belongs to \
     world {figure_world} but event belongs to world {event_world}"
  )]
  CrossWorld {
    figure_world: i64,
    event_world:  i64,
  },

  #[error("invalid world bounds: {0}")]
  InvalidWorldBounds(String),

  #[error("invalid input: {0}")]
  InvalidInput(String),

  #[error("an account with this email already exists")]
  DuplicateIdentity,

  #[error("invalid email or password")]
  InvalidCredentials,

  #[error("token signing secret is not configured")]
  ConfigurationMissing,

  #[error("token parse error: {0}")]
  TokenParse(String),

  #[error("password hash error: {0}")]
  PasswordHash(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
