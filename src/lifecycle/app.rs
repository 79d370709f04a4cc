use crate::config::SiteConfig;
use crate::fetch::ResourceFetcher;
use crate::host::NavigationHost;
use crate::interceptor::{LinkDecision, LinkInterceptor};
use crate::model::Route;
use crate::router::{NavigationId, RouterActor, RouterClient, RouterError};
use crate::signal::{DeferredRouteSignal, SignalStore};
use std::sync::Arc;
use tracing::{error, info};

/// Picks the route to open at startup.
///
/// A pending deferred route wins and is consumed; otherwise `default_route` is used.
pub fn initial_route<S: SignalStore>(
    signal: &DeferredRouteSignal<S>,
    default_route: &str,
) -> Result<Route, RouterError> {
    match signal.take() {
        Some(route) => {
            info!(%route, "Resuming deferred route");
            Ok(route)
        }
        None => Ok(Route::new(default_route)?),
    }
}

/// A running site: the router task plus the document-wide link interceptor.
///
/// `SiteApp` is responsible for:
/// - **Bootstrap**: choosing the initial route and performing the first load
/// - **Wiring**: installing the single [`LinkInterceptor`] for all later clicks
/// - **Shutdown**: closing the router and waiting for its task
///
/// # Example
///
/// ```ignore
/// let app = SiteApp::start(SiteConfig::default(), host, fetcher, storage).await?;
///
/// app.click(Some("contacts")).await?;          // routed
/// app.click(Some("https://github.com")).await?; // pass-through
///
/// app.shutdown().await?;
/// ```
pub struct SiteApp {
    /// Entry points for fragment scripts (`load_page`, `set_title`).
    pub router: RouterClient,

    interceptor: LinkInterceptor,
    initial: NavigationId,
    handle: tokio::task::JoinHandle<()>,
}

impl SiteApp {
    /// Starts the router and performs the first navigation.
    ///
    /// 1. Reads and clears the deferred route signal.
    /// 2. Falls back to the configured default route.
    /// 3. Loads the initial route.
    /// 4. Installs the link interceptor.
    pub async fn start<H, S>(
        config: SiteConfig,
        host: H,
        fetcher: Arc<dyn ResourceFetcher>,
        storage: S,
    ) -> Result<Self, RouterError>
    where
        H: NavigationHost,
        S: SignalStore,
    {
        let signal = DeferredRouteSignal::new(storage, config.signal_key.clone());
        let route = initial_route(&signal, &config.default_route)?;

        let (actor, router) = RouterActor::new(host, fetcher, &config);
        let handle = tokio::spawn(actor.run());

        let initial = match router.load_page(route).await {
            Ok(navigation) => navigation,
            Err(e) => {
                handle.abort();
                return Err(e);
            }
        };

        let interceptor = LinkInterceptor::new(router.clone());
        info!(site = %config.site.name, "Site started");

        Ok(Self {
            router,
            interceptor,
            initial,
            handle,
        })
    }

    /// The navigation issued at startup.
    pub fn initial_navigation(&self) -> NavigationId {
        self.initial
    }

    /// Dispatches a click on a link with target `href` through the interceptor.
    pub async fn click(&self, href: Option<&str>) -> Result<LinkDecision, RouterError> {
        self.interceptor.on_click(href).await
    }

    /// Gracefully shuts the site down.
    ///
    /// Dropping the last client closes the router's channel; the router finishes its
    /// current turn and exits. Clients cloned out of [`SiteApp::router`] keep it alive,
    /// so drop them first.
    pub async fn shutdown(self) -> Result<(), RouterError> {
        info!("Shutting down site...");

        drop(self.interceptor);
        drop(self.router);

        if let Err(e) = self.handle.await {
            error!("Router task failed: {:?}", e);
            return Err(RouterError::Shutdown(e.to_string()));
        }

        info!("Site shutdown complete.");
        Ok(())
    }
}
