//! # Site Configuration
//!
//! Everything the router needs to know about the site, fixed at startup.
//!
//! Every field has a default matching the "Blog IRS" site, so an empty file (or
//! [`SiteConfig::default`]) is a valid configuration:
//!
//! ```toml
//! default_route = "home"
//! signal_key = "path"
//! race_policy = "last-resolved-wins"
//! buffer_size = 32
//!
//! [site]
//! name = "Blog IRS"
//! slogan = "Talento, a gente já tem!"
//!
//! [pages]
//! root = "pages"
//! markup = "index.html"
//! stylesheet = "style.css"
//! script = "script.js"
//! ```

use crate::model::{PageLayout, SiteIdentity};
use crate::signal::DEFAULT_SIGNAL_KEY;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors loading a [`SiteConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do with a fragment that resolves after a newer navigation was issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RacePolicy {
    /// Whichever fetch resolves last is mounted, even if it belongs to an older
    /// navigation. Nothing is aborted.
    #[default]
    LastResolvedWins,
    /// A new navigation aborts the pending fragment fetch, and late results from older
    /// navigations are discarded.
    LastIssuedWins,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteIdentity,
    pub pages: PageLayout,
    /// Route loaded at startup when no deferred route is pending.
    pub default_route: String,
    /// Storage key of the deferred route signal.
    pub signal_key: String,
    pub race_policy: RacePolicy,
    /// Capacity of the router's request channel.
    pub buffer_size: usize,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteIdentity::default(),
            pages: PageLayout::default(),
            default_route: "home".to_string(),
            signal_key: DEFAULT_SIGNAL_KEY.to_string(),
            race_policy: RacePolicy::default(),
            buffer_size: 32,
        }
    }
}

impl SiteConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_race_policy(mut self, race_policy: RacePolicy) -> Self {
        self.race_policy = race_policy;
        self
    }
}
