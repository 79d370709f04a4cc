use serde::Deserialize;
use std::fmt::{self, Display};
use thiserror::Error;

/// Target prefixes that never name a route: absolute links and same-page anchors.
pub const RESERVED_PREFIXES: [&str; 3] = ["http://", "https://", "#"];

/// Reasons a string cannot be used as a [`Route`].
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RouteError {
    /// Routes must name something.
    #[error("Route is empty")]
    Empty,

    /// The string starts with one of [`RESERVED_PREFIXES`].
    #[error("Route {route:?} starts with reserved prefix {prefix:?}")]
    ReservedPrefix { route: String, prefix: &'static str },
}

/// An opaque, path-like identifier for a logical page (e.g. `home`, `contacts`).
///
/// Any non-empty string that does not start with a reserved prefix is accepted.
/// Whether the route actually exists is only discovered when its fragment is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Route(String);

impl Route {
    pub fn new(raw: impl Into<String>) -> Result<Self, RouteError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RouteError::Empty);
        }
        if let Some(prefix) = reserved_prefix(&raw) {
            return Err(RouteError::ReservedPrefix { route: raw, prefix });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Route {
    type Error = RouteError;

    fn try_from(raw: &str) -> Result<Self, Self::Error> {
        Route::new(raw)
    }
}

impl TryFrom<String> for Route {
    type Error = RouteError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Route::new(raw)
    }
}

/// Returns the reserved prefix `target` starts with, if any.
///
/// Only the start of the string matters; `blog/http://x` has no reserved prefix.
pub fn reserved_prefix(target: &str) -> Option<&'static str> {
    RESERVED_PREFIXES
        .into_iter()
        .find(|prefix| target.starts_with(prefix))
}

/// Directory convention mapping a route to its three resources.
///
/// For route `R` the resources live at `{root}/R/{markup}`, `{root}/R/{stylesheet}`
/// and `{root}/R/{script}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub root: String,
    pub markup: String,
    pub stylesheet: String,
    pub script: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            root: "pages".to_string(),
            markup: "index.html".to_string(),
            stylesheet: "style.css".to_string(),
            script: "script.js".to_string(),
        }
    }
}

impl PageLayout {
    pub fn resources(&self, route: &Route) -> PageResources {
        let dir = format!("{}/{}", self.root.trim_end_matches('/'), route);
        PageResources {
            route: route.clone(),
            markup: format!("{}/{}", dir, self.markup),
            stylesheet: format!("{}/{}", dir, self.stylesheet),
            script: format!("{}/{}", dir, self.script),
        }
    }
}

/// The three resource locations of one route. Derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResources {
    pub route: Route,
    pub markup: String,
    pub stylesheet: String,
    pub script: String,
}
