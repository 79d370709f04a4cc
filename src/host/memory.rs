//! # In-Memory Host
//!
//! A headless [`NavigationHost`] that keeps the document state in memory and records
//! every mutation in order. Clones share the same state, so a test (or the demo binary)
//! can hand one clone to the router and inspect the other.
//!
//! ```ignore
//! let host = MemoryHost::new();
//! let app = SiteApp::start(config, host.clone(), fetcher, storage).await?;
//! host.wait_until(|doc| doc.content.is_some()).await;
//! ```

use super::NavigationHost;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tracing::debug;

/// One recorded mutation of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Mounted(String),
    Stylesheet(String),
    HistoryPushed(String),
    ScrolledToTop,
    Title(String),
    ScriptExecuted { location: String, source: String },
    WentBack,
}

/// Snapshot of the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Markup of the content region. `None` until the first fragment is mounted.
    pub content: Option<String>,
    pub stylesheet: Option<String>,
    pub title: Option<String>,
    /// Current address bar path.
    pub location: Option<String>,
    /// History entries, oldest first. The current entry is `history[cursor]`.
    pub history: Vec<String>,
    cursor: usize,
    pub events: Vec<HostEvent>,
}

impl Document {
    pub fn mounts(&self) -> usize {
        self.count(|event| matches!(event, HostEvent::Mounted(_)))
    }

    pub fn executed_scripts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::ScriptExecuted { location, .. } => Some(location.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.events.iter().filter(|event| pred(event)).count()
    }
}

/// Shared, observable in-memory document.
#[derive(Clone, Default)]
pub struct MemoryHost {
    document: Arc<Mutex<Document>>,
    changed: Arc<Notify>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current document.
    pub fn snapshot(&self) -> Document {
        self.lock().clone()
    }

    /// Waits until `pred` holds for the document.
    ///
    /// Re-checks after every mutation. Wrap in `tokio::time::timeout` when the condition
    /// may never become true.
    pub async fn wait_until(&self, pred: impl Fn(&Document) -> bool) {
        loop {
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if pred(&*self.lock()) {
                return;
            }
            notified.await;
        }
    }

    /// Browser back button.
    ///
    /// Moves the address bar to the previous history entry. Nothing listens for it, so the
    /// mounted content stays as it is.
    pub fn back(&self) {
        self.apply(|doc| {
            if doc.cursor > 0 {
                doc.cursor -= 1;
                doc.location = doc.history.get(doc.cursor).cloned();
                doc.events.push(HostEvent::WentBack);
            }
        });
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, f: impl FnOnce(&mut Document)) {
        {
            let mut doc = self.lock();
            f(&mut doc);
        }
        self.changed.notify_waiters();
    }
}

impl NavigationHost for MemoryHost {
    fn mount_fragment(&mut self, markup: &str) {
        debug!(bytes = markup.len(), "Mount fragment");
        self.apply(|doc| {
            doc.content = Some(markup.to_string());
            doc.events.push(HostEvent::Mounted(markup.to_string()));
        });
    }

    fn set_stylesheet(&mut self, href: &str) {
        self.apply(|doc| {
            doc.stylesheet = Some(href.to_string());
            doc.events.push(HostEvent::Stylesheet(href.to_string()));
        });
    }

    fn push_history(&mut self, path: &str) {
        self.apply(|doc| {
            // Pushing after going back drops the forward entries, like a browser.
            if !doc.history.is_empty() {
                doc.history.truncate(doc.cursor + 1);
            }
            doc.history.push(path.to_string());
            doc.cursor = doc.history.len() - 1;
            doc.location = Some(path.to_string());
            doc.events.push(HostEvent::HistoryPushed(path.to_string()));
        });
    }

    fn scroll_to_top(&mut self) {
        self.apply(|doc| doc.events.push(HostEvent::ScrolledToTop));
    }

    fn set_title(&mut self, title: &str) {
        self.apply(|doc| {
            doc.title = Some(title.to_string());
            doc.events.push(HostEvent::Title(title.to_string()));
        });
    }

    fn execute_script(&mut self, location: &str, source: &str) {
        debug!(location, bytes = source.len(), "Execute script");
        self.apply(|doc| {
            doc.events.push(HostEvent::ScriptExecuted {
                location: location.to_string(),
                source: source.to_string(),
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_back_moves_location_only() {
        let mut host = MemoryHost::new();
        host.push_history("home");
        host.mount_fragment("<h1>Home</h1>");
        host.push_history("about");
        host.mount_fragment("<h1>About</h1>");

        host.back();

        let doc = host.snapshot();
        assert_eq!(doc.location.as_deref(), Some("home"));
        assert_eq!(doc.content.as_deref(), Some("<h1>About</h1>"));
        assert_eq!(doc.history, vec!["home", "about"]);
    }

    #[test]
    fn test_push_after_back_drops_forward_entries() {
        let mut host = MemoryHost::new();
        host.push_history("home");
        host.push_history("about");
        host.back();
        host.push_history("contacts");

        assert_eq!(host.snapshot().history, vec!["home", "contacts"]);
    }

    #[tokio::test]
    async fn test_wait_until_wakes_on_mutation() {
        let host = MemoryHost::new();
        let mut writer = host.clone();

        let waiter = tokio::spawn({
            let host = host.clone();
            async move { host.wait_until(|doc| doc.mounts() == 1).await }
        });

        tokio::task::yield_now().await;
        writer.mount_fragment("<p>hi</p>");

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter timed out")
            .unwrap();
    }
}
