use super::{FetchError, ResourceFetcher};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Serves resources from a site directory, the way a static web server would.
///
/// Locations are resolved relative to `root`. Locations that would escape `root`
/// (`..` segments, absolute paths) are reported as not found.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    root: PathBuf,
}

impl FsFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, location: &str) -> Option<PathBuf> {
        let relative = Path::new(location.trim_start_matches('/'));
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));
        contained.then(|| self.root.join(relative))
    }
}

#[async_trait]
impl ResourceFetcher for FsFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let path = self
            .resolve(location)
            .ok_or_else(|| FetchError::NotFound(location.to_string()))?;
        debug!(location, path = %path.display(), "Fetch");

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => FetchError::NotFound(location.to_string()),
                _ => FetchError::Io {
                    location: location.to_string(),
                    message: e.to_string(),
                },
            })
    }
}
