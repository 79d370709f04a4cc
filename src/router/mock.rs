//! # Mock Fetcher
//!
//! Utilities for testing the router without serving real files.
//!
//! [`MockFetcher`] answers fetches from a queue of expectations per location.
//! An expectation either answers immediately ([`FetchExpectationBuilder::return_ok`],
//! [`FetchExpectationBuilder::return_err`]) or stays pending until the test releases it
//! ([`FetchExpectationBuilder::deferred`]), which is how tests decide the order in which
//! concurrent fetches resolve.
//!
//! ```ignore
//! let mock = MockFetcher::new();
//! mock.expect_fetch("pages/home/index.html").return_ok("<h1>Home</h1>");
//! let slow = mock.expect_fetch("pages/about/index.html").deferred();
//!
//! let (actor, client) = RouterActor::new(host, mock.shared(), &config);
//! // ...
//! slow.resolve_ok("<h1>About</h1>");
//! mock.verify(); // Ensures all expectations were consumed
//! ```
//!
//! Fetches with no matching expectation answer [`FetchError::NotFound`], like a missing
//! file on a real server.

use crate::fetch::{FetchError, ResourceFetcher};
use crate::model::PageResources;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::{oneshot, Notify};

// =============================================================================
// EXPECTATIONS
// =============================================================================

enum Expectation {
    Ready(Result<String, FetchError>),
    Deferred(oneshot::Receiver<Result<String, FetchError>>),
}

#[derive(Default)]
struct MockState {
    expectations: HashMap<String, VecDeque<Expectation>>,
    calls: Vec<String>,
    resolved: usize,
}

/// A [`ResourceFetcher`] driven by expectations. Clones share the same state.
#[derive(Clone, Default)]
pub struct MockFetcher {
    state: Arc<Mutex<MockState>>,
    resolved: Arc<Notify>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fetcher as the router takes it.
    pub fn shared(&self) -> Arc<dyn ResourceFetcher> {
        Arc::new(self.clone())
    }

    /// Expects one fetch of `location`. Expectations for the same location are consumed
    /// in the order they were set.
    pub fn expect_fetch(&self, location: impl Into<String>) -> FetchExpectationBuilder {
        FetchExpectationBuilder {
            location: location.into(),
            state: self.state.clone(),
        }
    }

    /// Expects a full page load: markup, then script.
    pub fn expect_page(&self, resources: &PageResources, markup: &str, script: &str) {
        self.expect_fetch(resources.markup.clone()).return_ok(markup);
        self.expect_fetch(resources.script.clone()).return_ok(script);
    }

    /// Every location fetched so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Waits until `count` fetches have produced their answer.
    pub async fn wait_for_resolved(&self, count: usize) {
        loop {
            let notified = self.resolved.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.state.lock().unwrap().resolved >= count {
                return;
            }
            notified.await;
        }
    }

    /// Verifies that all expectations were consumed.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        let remaining: usize = state.expectations.values().map(VecDeque::len).sum();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn finish(&self, result: Result<String, FetchError>) -> Result<String, FetchError> {
        self.state.lock().unwrap().resolved += 1;
        self.resolved.notify_waiters();
        result
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn fetch(&self, location: &str) -> Result<String, FetchError> {
        let expectation = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(location.to_string());
            state
                .expectations
                .get_mut(location)
                .and_then(VecDeque::pop_front)
        };

        let result = match expectation {
            Some(Expectation::Ready(result)) => result,
            Some(Expectation::Deferred(pending)) => pending.await.unwrap_or_else(|_| {
                Err(FetchError::Io {
                    location: location.to_string(),
                    message: "pending fetch dropped".to_string(),
                })
            }),
            None => Err(FetchError::NotFound(location.to_string())),
        };
        self.finish(result)
    }
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Builder for one expected fetch.
pub struct FetchExpectationBuilder {
    location: String,
    state: Arc<Mutex<MockState>>,
}

impl FetchExpectationBuilder {
    /// Answers the fetch with `body`.
    pub fn return_ok(self, body: impl Into<String>) {
        self.push(Expectation::Ready(Ok(body.into())));
    }

    /// Answers the fetch with an error.
    pub fn return_err(self, error: FetchError) {
        self.push(Expectation::Ready(Err(error)));
    }

    /// Leaves the fetch pending until the returned handle is resolved.
    pub fn deferred(self) -> PendingFetch {
        let (sender, receiver) = oneshot::channel();
        self.push(Expectation::Deferred(receiver));
        PendingFetch { sender }
    }

    fn push(self, expectation: Expectation) {
        let mut state = self.state.lock().unwrap();
        state
            .expectations
            .entry(self.location)
            .or_default()
            .push_back(expectation);
    }
}

/// Release handle for a deferred fetch.
pub struct PendingFetch {
    sender: oneshot::Sender<Result<String, FetchError>>,
}

impl PendingFetch {
    /// Resolves the fetch with `body`. Returns `false` if the fetch was abandoned
    /// (its task aborted) in the meantime.
    pub fn resolve_ok(self, body: impl Into<String>) -> bool {
        self.sender.send(Ok(body.into())).is_ok()
    }

    pub fn resolve_err(self, error: FetchError) -> bool {
        self.sender.send(Err(error)).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_expectations_consumed_in_order() {
        let mock = MockFetcher::new();
        mock.expect_fetch("a").return_ok("first");
        mock.expect_fetch("a").return_err(FetchError::NotFound("a".into()));

        assert_eq!(mock.fetch("a").await, Ok("first".to_string()));
        assert_eq!(mock.fetch("a").await, Err(FetchError::NotFound("a".into())));
        assert_eq!(mock.fetch("b").await, Err(FetchError::NotFound("b".into())));
        assert_eq!(mock.calls(), vec!["a", "a", "b"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_deferred_fetch_waits_for_release() {
        let mock = MockFetcher::new();
        let pending = mock.expect_fetch("slow").deferred();

        let task = tokio::spawn({
            let mock = mock.clone();
            async move { mock.fetch("slow").await }
        });
        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        assert!(pending.resolve_ok("done"));
        assert_eq!(task.await.unwrap(), Ok("done".to_string()));
        mock.wait_for_resolved(1).await;
    }

    #[test]
    #[should_panic(expected = "Not all expectations were met")]
    fn test_verify_panics_on_unmet() {
        let mock = MockFetcher::new();
        mock.expect_fetch("never").return_ok("");
        mock.verify();
    }
}
