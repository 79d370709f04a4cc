//! Fetching fragment resources.

pub mod fs;

pub use fs::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors a [`ResourceFetcher`] can report. The router logs and swallows them.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// Nothing is served at this location.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The resource exists but could not be read.
    #[error("Failed to fetch {location}: {message}")]
    Io { location: String, message: String },
}

/// Asynchronous source of fragment markup and scripts.
///
/// Implementations are shared between concurrently running fetch tasks.
#[async_trait]
pub trait ResourceFetcher: Send + Sync + 'static {
    async fn fetch(&self, location: &str) -> Result<String, FetchError>;
}
