//! Identity for Storykeeper: password hashing, stateless bearer tokens, and
//! the registration and login flows built on them.

pub mod password;
pub mod service;
pub mod token;

pub use password::Argon2Hasher;
pub use service::AuthService;
pub use token::TokenService;
