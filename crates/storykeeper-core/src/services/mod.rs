//! Scoped services.
//!
//! Each operation is a fixed composition: resolve the target (or its parent
//! world) for the caller, validate, then apply a single store mutation.
//! Nothing is cached between calls, so every operation sees current state.

mod event;
mod figure;
mod world;

pub use event::EventService;
pub use figure::FigureService;
pub use world::WorldService;
