//! Startup, wiring and shutdown of the router.

pub mod app;
pub mod tracing;

pub use app::*;
