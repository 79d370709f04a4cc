//! # Deferred Route Signal
//!
//! A one-shot "go to this route on next load" instruction. Some page writes it right
//! before navigating away from the shell; the next startup reads it and clears it.
//!
//! The value lives in a [`SignalStore`] under a fixed key, the same way a browser page
//! would keep it in local storage.

pub mod storage;

pub use storage::*;

use crate::model::Route;
use tracing::{debug, warn};

/// Key/value storage surviving a full page load.
pub trait SignalStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Default storage key, shared with the pages that write the signal.
pub const DEFAULT_SIGNAL_KEY: &str = "path";

/// Reader/writer for the deferred route under one key.
pub struct DeferredRouteSignal<S> {
    store: S,
    key: String,
}

impl<S: SignalStore> DeferredRouteSignal<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Records `route` as the route to open on next startup, replacing any pending one.
    pub fn defer(&self, route: &Route) -> Result<(), StorageError> {
        debug!(key = %self.key, %route, "Deferring route");
        self.store.set_item(&self.key, route.as_str())
    }

    /// Reads and clears the pending route.
    ///
    /// The key is removed whether or not a value was present or valid, so a value can
    /// never be read twice. An invalid stored value is dropped and reported as absent.
    pub fn take(&self) -> Option<Route> {
        let value = self.store.get_item(&self.key);
        if let Err(e) = self.store.remove_item(&self.key) {
            warn!(key = %self.key, error = %e, "Failed to clear deferred route");
        }

        let value = value?;
        match Route::try_from(value) {
            Ok(route) => Some(route),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Ignoring invalid deferred route");
                None
            }
        }
    }
}
