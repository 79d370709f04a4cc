//! # Router Core
//!
//! The router is an actor: one Tokio task that owns the navigation host and processes
//! requests and fetch completions one at a time. Fetches run in their own tasks and
//! report back over a channel, so the document is only ever touched from the router's
//! turn and two fragment swaps can never interleave.
//!
//! ## Key Types
//!
//! - [`RouterActor`]: the task owning the host.
//! - [`RouterClient`]: the handle everything else talks to.
//! - [`NavigationId`]: sequence number of an issued navigation.
//! - [`RouterError`]: channel failures and invalid routes.
//!
//! ## Navigation Sequence
//!
//! For `load_page(R)` the router, on its own turn:
//! 1. spawns the fetch of `R`'s markup,
//! 2. scrolls to the top and pushes one history entry for `R` (not waiting for the fetch),
//! 3. answers the caller with the new [`NavigationId`].
//!
//! When the markup arrives it is mounted, and only then is the stylesheet repointed and
//! the behavior script fetched. A script is executed when its fetch completes.
//! A failed fetch is logged and leaves the document as it was.
//!
//! Which late results are applied depends on the [`RacePolicy`].

use crate::config::{RacePolicy, SiteConfig};
use crate::fetch::{FetchError, ResourceFetcher};
use crate::host::NavigationHost;
use crate::model::{PageLayout, PageResources, Route, RouteError, SiteIdentity};
use std::fmt::{self, Display};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. MESSAGES & ERRORS
// =============================================================================

/// Errors surfaced by [`RouterClient`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RouterError {
    #[error("Router closed")]
    ActorClosed,
    #[error("Router dropped response channel")]
    ActorDropped,
    #[error("Invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
    #[error("Shutdown failed: {0}")]
    Shutdown(String),
}

/// Type alias for the one-shot response channel used by the router.
pub type Response<T> = oneshot::Sender<Result<T, RouterError>>;

/// Sequence number of an issued navigation. Later navigations have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NavigationId(u64);

impl NavigationId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for NavigationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Requests accepted by the router.
#[derive(Debug)]
pub enum RouterRequest {
    LoadPage {
        route: Route,
        respond_to: Response<NavigationId>,
    },
    SetTitle {
        title: Option<String>,
        respond_to: Response<String>,
    },
}

/// Results of fetch tasks, delivered back to the router's turn.
#[derive(Debug)]
enum Completion {
    Fragment {
        navigation: NavigationId,
        resources: PageResources,
        result: Result<String, FetchError>,
    },
    Script {
        navigation: NavigationId,
        location: String,
        result: Result<String, FetchError>,
    },
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// Task owning the navigation host.
///
/// Processes client requests and fetch completions sequentially, so the host needs no
/// locking. Completions are drained before new requests.
pub struct RouterActor<H: NavigationHost> {
    receiver: mpsc::Receiver<RouterRequest>,
    completions: mpsc::UnboundedReceiver<Completion>,
    completion_sender: mpsc::UnboundedSender<Completion>,
    host: H,
    fetcher: Arc<dyn ResourceFetcher>,
    layout: PageLayout,
    site: Arc<SiteIdentity>,
    policy: RacePolicy,
    issued: u64,
    latest: Option<NavigationId>,
    pending_fragment: Option<JoinHandle<()>>,
}

impl<H: NavigationHost> RouterActor<H> {
    pub fn new(
        host: H,
        fetcher: Arc<dyn ResourceFetcher>,
        config: &SiteConfig,
    ) -> (Self, RouterClient) {
        let (sender, receiver) = mpsc::channel(config.buffer_size.max(1));
        let (completion_sender, completions) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            completions,
            completion_sender,
            host,
            fetcher,
            layout: config.pages.clone(),
            site: Arc::new(config.site.clone()),
            policy: config.race_policy,
            issued: 0,
            latest: None,
            pending_fragment: None,
        };
        (actor, RouterClient::new(sender))
    }

    /// Runs the router until every [`RouterClient`] has been dropped.
    ///
    /// Fetches still in flight at that point are left to finish on their own; their
    /// results are dropped.
    pub async fn run(mut self) {
        info!(site = %self.site.name, policy = ?self.policy, "Router started");

        loop {
            tokio::select! {
                biased;
                Some(completion) = self.completions.recv() => self.on_completion(completion),
                request = self.receiver.recv() => match request {
                    Some(request) => self.on_request(request),
                    None => break,
                },
            }
        }

        info!(navigations = self.issued, "Shutdown");
    }

    fn on_request(&mut self, request: RouterRequest) {
        match request {
            RouterRequest::LoadPage { route, respond_to } => {
                let navigation = self.navigate(route);
                let _ = respond_to.send(Ok(navigation));
            }
            RouterRequest::SetTitle { title, respond_to } => {
                let title = self.site.title(title.as_deref());
                debug!(%title, "Set title");
                self.host.set_title(&title);
                let _ = respond_to.send(Ok(title));
            }
        }
    }

    fn navigate(&mut self, route: Route) -> NavigationId {
        self.issued += 1;
        let navigation = NavigationId(self.issued);
        let resources = self.layout.resources(&route);
        debug!(%route, %navigation, ?resources, "Navigate");

        if self.policy == RacePolicy::LastIssuedWins {
            if let Some(pending) = self.pending_fragment.take() {
                pending.abort();
            }
        }
        self.latest = Some(navigation);

        let location = resources.markup.clone();
        let fragment = self.spawn_fetch(location, move |_, result| Completion::Fragment {
            navigation,
            resources,
            result,
        });
        self.pending_fragment = Some(fragment);

        // Not gated on the fetch: the address bar follows the click immediately.
        self.host.scroll_to_top();
        self.host.push_history(route.as_str());
        info!(%route, %navigation, "Navigation issued");

        navigation
    }

    fn on_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Fragment {
                navigation,
                resources,
                result,
            } => {
                let route = &resources.route;
                if self.is_superseded(navigation) {
                    debug!(%route, %navigation, "Discarding superseded fragment");
                    return;
                }
                match result {
                    Ok(markup) => {
                        self.host.mount_fragment(&markup);
                        self.host.set_stylesheet(&resources.stylesheet);
                        info!(%route, %navigation, "Fragment mounted");

                        self.spawn_fetch(resources.script, move |location, result| {
                            Completion::Script {
                                navigation,
                                location,
                                result,
                            }
                        });
                    }
                    Err(e) => {
                        warn!(%route, %navigation, error = %e, "Fragment fetch failed, content unchanged");
                    }
                }
            }
            Completion::Script {
                navigation,
                location,
                result,
            } => {
                if self.is_superseded(navigation) {
                    debug!(%location, %navigation, "Discarding superseded script");
                    return;
                }
                match result {
                    Ok(source) => {
                        self.host.execute_script(&location, &source);
                        debug!(%location, %navigation, "Script executed");
                    }
                    Err(e) => warn!(%location, %navigation, error = %e, "Script fetch failed"),
                }
            }
        }
    }

    fn is_superseded(&self, navigation: NavigationId) -> bool {
        self.policy == RacePolicy::LastIssuedWins && self.latest != Some(navigation)
    }

    fn spawn_fetch(
        &self,
        location: String,
        complete: impl FnOnce(String, Result<String, FetchError>) -> Completion + Send + 'static,
    ) -> JoinHandle<()> {
        let fetcher = Arc::clone(&self.fetcher);
        let sender = self.completion_sender.clone();
        tokio::spawn(async move {
            let result = fetcher.fetch(&location).await;
            // The router may already be gone; nobody is left to apply the result.
            let _ = sender.send(complete(location, result));
        })
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// Handle to a running [`RouterActor`].
///
/// These are the entry points exposed to the rest of the site, including fragment
/// scripts: load another page, change the document title.
#[derive(Clone)]
pub struct RouterClient {
    sender: mpsc::Sender<RouterRequest>,
}

impl RouterClient {
    pub fn new(sender: mpsc::Sender<RouterRequest>) -> Self {
        Self { sender }
    }

    /// Starts a navigation to `route`.
    ///
    /// Returns once history and scroll position are updated and the fragment fetch is
    /// issued. The fragment itself is mounted later, or never if the fetch fails.
    #[instrument(skip_all, fields(route = %route))]
    pub async fn load_page(&self, route: Route) -> Result<NavigationId, RouterError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(RouterRequest::LoadPage { route, respond_to })
            .await
            .map_err(|_| RouterError::ActorClosed)?;
        response.await.map_err(|_| RouterError::ActorDropped)?
    }

    /// Like [`load_page`](Self::load_page) for an unchecked string.
    pub async fn load(&self, route: &str) -> Result<NavigationId, RouterError> {
        self.load_page(Route::try_from(route)?).await
    }

    /// Sets the document title from an optional page title and returns it.
    #[instrument(skip(self))]
    pub async fn set_title(&self, title: Option<&str>) -> Result<String, RouterError> {
        let (respond_to, response) = oneshot::channel();
        let title = title.map(str::to_string);
        self.sender
            .send(RouterRequest::SetTitle { title, respond_to })
            .await
            .map_err(|_| RouterError::ActorClosed)?;
        response.await.map_err(|_| RouterError::ActorDropped)?
    }
}

// =============================================================================
// 4. TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostEvent, MemoryHost};
    use crate::router::mock::MockFetcher;
    use std::time::Duration;

    fn start(
        mock: &MockFetcher,
        policy: RacePolicy,
    ) -> (MemoryHost, RouterClient, JoinHandle<()>) {
        let host = MemoryHost::new();
        let config = SiteConfig::default().with_race_policy(policy);
        let (actor, client) = RouterActor::new(host.clone(), mock.shared(), &config);
        let handle = tokio::spawn(actor.run());
        (host, client, handle)
    }

    async fn settle(host: &MemoryHost, pred: impl Fn(&crate::host::Document) -> bool) {
        tokio::time::timeout(Duration::from_secs(2), host.wait_until(pred))
            .await
            .expect("document never reached expected state");
    }

    #[tokio::test]
    async fn test_mount_then_stylesheet_then_script() {
        let mock = MockFetcher::new();
        mock.expect_fetch("pages/home/index.html").return_ok("<h1>Home</h1>");
        mock.expect_fetch("pages/home/script.js").return_ok("changeTitle()");
        let (host, client, handle) = start(&mock, RacePolicy::LastResolvedWins);

        let navigation = client.load("home").await.unwrap();
        assert_eq!(navigation.get(), 1);
        settle(&host, |doc| !doc.executed_scripts().is_empty()).await;

        let doc = host.snapshot();
        assert_eq!(
            doc.events,
            vec![
                HostEvent::ScrolledToTop,
                HostEvent::HistoryPushed("home".into()),
                HostEvent::Mounted("<h1>Home</h1>".into()),
                HostEvent::Stylesheet("pages/home/style.css".into()),
                HostEvent::ScriptExecuted {
                    location: "pages/home/script.js".into(),
                    source: "changeTitle()".into(),
                },
            ]
        );
        mock.verify();

        drop(client);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_history_pushed_before_fragment_resolves() {
        let mock = MockFetcher::new();
        let pending = mock.expect_fetch("pages/about/index.html").deferred();
        let (host, client, _handle) = start(&mock, RacePolicy::LastResolvedWins);

        client.load("about").await.unwrap();

        let doc = host.snapshot();
        assert_eq!(doc.location.as_deref(), Some("about"));
        assert_eq!(doc.history, vec!["about"]);
        assert_eq!(doc.content, None);

        pending.resolve_ok("<p>About</p>");
        settle(&host, |doc| doc.content.is_some()).await;
    }

    #[tokio::test]
    async fn test_failed_fragment_leaves_document_unchanged() {
        let mock = MockFetcher::new();
        mock.expect_fetch("pages/home/index.html").return_ok("<h1>Home</h1>");
        mock.expect_fetch("pages/missing/index.html")
            .return_err(FetchError::NotFound("pages/missing/index.html".into()));
        let (host, client, _handle) = start(&mock, RacePolicy::LastResolvedWins);

        client.load("home").await.unwrap();
        settle(&host, |doc| doc.mounts() == 1).await;
        client.load("missing").await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), mock.wait_for_resolved(3))
            .await
            .expect("fetches never resolved");
        // One more round trip so the failed completion has been applied.
        client.set_title(None).await.unwrap();

        let doc = host.snapshot();
        assert_eq!(doc.content.as_deref(), Some("<h1>Home</h1>"));
        assert_eq!(doc.stylesheet.as_deref(), Some("pages/home/style.css"));
        assert_eq!(doc.location.as_deref(), Some("missing"));
        assert_eq!(doc.mounts(), 1);
    }

    #[tokio::test]
    async fn test_deferred_fragment_failure_keeps_previous_page() {
        let mock = MockFetcher::new();
        mock.expect_fetch("pages/home/index.html").return_ok("<h1>Home</h1>");
        let pending = mock.expect_fetch("pages/profile/index.html").deferred();
        let (host, client, _handle) = start(&mock, RacePolicy::LastIssuedWins);

        client.load("home").await.unwrap();
        settle(&host, |doc| doc.mounts() == 1).await;
        client.load("profile").await.unwrap();

        assert!(pending.resolve_err(FetchError::Io {
            location: "pages/profile/index.html".into(),
            message: "connection reset".into(),
        }));
        tokio::time::timeout(Duration::from_secs(2), mock.wait_for_resolved(3))
            .await
            .expect("fragment fetch never resolved");
        client.set_title(None).await.unwrap();

        let doc = host.snapshot();
        assert_eq!(doc.content.as_deref(), Some("<h1>Home</h1>"));
        assert_eq!(doc.stylesheet.as_deref(), Some("pages/home/style.css"));
        assert_eq!(doc.location.as_deref(), Some("profile"));
        assert!(!mock.calls().contains(&"pages/profile/script.js".to_string()));
    }

    /// A's fragment is already queued when B is issued; the router applies it after B.
    fn apply_fragment_after_newer_navigation(policy: RacePolicy) -> MemoryHost {
        let mock = MockFetcher::new();
        let _pending_a = mock.expect_fetch("pages/a/index.html").deferred();
        let _pending_b = mock.expect_fetch("pages/b/index.html").deferred();
        let host = MemoryHost::new();
        let config = SiteConfig::default().with_race_policy(policy);
        let (mut actor, _client) = RouterActor::new(host.clone(), mock.shared(), &config);

        let route_a = Route::new("a").unwrap();
        let a = actor.navigate(route_a.clone());
        let b = actor.navigate(Route::new("b").unwrap());
        assert!(a < b);

        actor.on_completion(Completion::Fragment {
            navigation: a,
            resources: config.pages.resources(&route_a),
            result: Ok("<p>A</p>".to_string()),
        });
        host
    }

    #[tokio::test]
    async fn test_last_issued_wins_discards_queued_fragment() {
        let host = apply_fragment_after_newer_navigation(RacePolicy::LastIssuedWins);

        let doc = host.snapshot();
        assert_eq!(doc.content, None);
        assert_eq!(doc.stylesheet, None);
        assert_eq!(doc.mounts(), 0);
        assert_eq!(doc.history, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_last_resolved_wins_applies_queued_fragment() {
        let host = apply_fragment_after_newer_navigation(RacePolicy::LastResolvedWins);

        let doc = host.snapshot();
        assert_eq!(doc.content.as_deref(), Some("<p>A</p>"));
        assert_eq!(doc.stylesheet.as_deref(), Some("pages/a/style.css"));
        assert_eq!(doc.location.as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn test_set_title() {
        let mock = MockFetcher::new();
        let (host, client, _handle) = start(&mock, RacePolicy::LastResolvedWins);

        let title = client.set_title(Some("Contato")).await.unwrap();
        assert_eq!(title, "Blog IRS ·:· Contato");
        assert_eq!(host.snapshot().title.as_deref(), Some("Blog IRS ·:· Contato"));

        client.set_title(None).await.unwrap();
        assert_eq!(
            host.snapshot().title.as_deref(),
            Some("Blog IRS ·:· Talento, a gente já tem!")
        );
    }

    #[tokio::test]
    async fn test_invalid_route_is_rejected() {
        let mock = MockFetcher::new();
        let (host, client, _handle) = start(&mock, RacePolicy::LastResolvedWins);

        assert_eq!(client.load("").await, Err(RouterError::InvalidRoute(RouteError::Empty)));
        assert!(host.snapshot().history.is_empty());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_closed_router() {
        let mock = MockFetcher::new();
        let (_host, client, handle) = start(&mock, RacePolicy::LastResolvedWins);
        handle.abort();
        let _ = handle.await;

        assert_eq!(client.load("home").await, Err(RouterError::ActorClosed));
    }
}
