//! The partial-page navigation engine.
//!
//! # Main Components
//!
//! - [`RouterActor`] - Owns the [`NavigationHost`](crate::host::NavigationHost) and applies every navigation
//! - [`RouterClient`] - Cloneable handle exposing `load_page` and `set_title`
//! - [`RouterError`] - Errors surfaced to callers
//!
//! # Testing
//!
//! See [`mock`] for a scriptable [`ResourceFetcher`](crate::fetch::ResourceFetcher).

pub mod core;
pub mod mock;

pub use core::*;
