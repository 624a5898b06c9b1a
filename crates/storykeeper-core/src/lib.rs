//! Core types and trait definitions for the Storykeeper backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! owns the domain model, the store abstractions, and every authorization
//! decision: the ownership resolver, the link integrity guard, and the scoped
//! services built on top of them.

pub mod error;
pub mod event;
pub mod figure;
pub mod identity;
pub mod link;
pub mod ownership;
pub mod page;
pub mod password;
pub mod services;
pub mod store;
pub mod world;

mod text;

pub use error::{Error, Result};
