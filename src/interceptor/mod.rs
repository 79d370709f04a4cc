//! # Link Interceptor
//!
//! Decides, for every clicked link in the document, whether the router handles it or the
//! browser's default navigation proceeds.
//!
//! There is exactly one interceptor per document, installed at startup. Every click goes
//! through it no matter which fragment rendered the link, so fragments swapped in later
//! need no wiring of their own.

use crate::model::{reserved_prefix, Route};
use crate::router::{NavigationId, RouterClient, RouterError};
use tracing::{debug, instrument};

/// Classification of a link target.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkTarget {
    /// Absolute URL or same-page anchor, left to the browser.
    External,
    /// A route the router loads in place.
    Internal(Route),
    /// No target, or an empty one.
    Missing,
}

impl LinkTarget {
    /// Classifies a raw `href`. Only the start of the string is inspected.
    pub fn classify(href: Option<&str>) -> Self {
        let Some(href) = href else {
            return LinkTarget::Missing;
        };
        if reserved_prefix(href).is_some() {
            return LinkTarget::External;
        }
        match Route::new(href) {
            Ok(route) => LinkTarget::Internal(route),
            Err(_) => LinkTarget::Missing,
        }
    }
}

/// Outcome of a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkDecision {
    /// Let the browser follow the link.
    PassThrough,
    /// Default prevented; the router started this navigation.
    Handled(NavigationId),
}

impl LinkDecision {
    pub fn prevents_default(&self) -> bool {
        matches!(self, LinkDecision::Handled(_))
    }
}

/// The document-wide click handler.
#[derive(Clone)]
pub struct LinkInterceptor {
    router: RouterClient,
}

impl LinkInterceptor {
    pub fn new(router: RouterClient) -> Self {
        Self { router }
    }

    /// Handles a click on a link whose target attribute is `href`.
    ///
    /// Internal targets cause exactly one `load_page` call; everything else passes through
    /// without touching the router.
    #[instrument(skip(self))]
    pub async fn on_click(&self, href: Option<&str>) -> Result<LinkDecision, RouterError> {
        match LinkTarget::classify(href) {
            LinkTarget::Internal(route) => {
                let navigation = self.router.load_page(route).await?;
                Ok(LinkDecision::Handled(navigation))
            }
            target => {
                debug!(?target, "Pass-through");
                Ok(LinkDecision::PassThrough)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::RouterRequest;
    use tokio::sync::mpsc;

    #[test]
    fn test_classify_reserved_prefixes() {
        assert_eq!(LinkTarget::classify(Some("http://example.com")), LinkTarget::External);
        assert_eq!(
            LinkTarget::classify(Some("https://facebook.com/Mulheres.Tech")),
            LinkTarget::External
        );
        assert_eq!(LinkTarget::classify(Some("#top")), LinkTarget::External);
    }

    #[test]
    fn test_classify_internal_and_missing() {
        assert_eq!(
            LinkTarget::classify(Some("contacts")),
            LinkTarget::Internal(Route::new("contacts").unwrap())
        );
        assert_eq!(
            LinkTarget::classify(Some("go/http://x")),
            LinkTarget::Internal(Route::new("go/http://x").unwrap())
        );
        assert_eq!(
            LinkTarget::classify(Some("HTTPS://upper.example")),
            LinkTarget::Internal(Route::new("HTTPS://upper.example").unwrap())
        );
        assert_eq!(LinkTarget::classify(Some("")), LinkTarget::Missing);
        assert_eq!(LinkTarget::classify(None), LinkTarget::Missing);
    }

    #[tokio::test]
    async fn test_on_click_sends_one_load_request() {
        let (sender, mut receiver) = mpsc::channel(8);
        let interceptor = LinkInterceptor::new(RouterClient::new(sender));

        let click = tokio::spawn(async move { interceptor.on_click(Some("about")).await });

        match receiver.recv().await {
            Some(RouterRequest::LoadPage { route, respond_to }) => {
                assert_eq!(route.as_str(), "about");
                let _ = respond_to.send(Ok(NavigationId::new(1)));
            }
            other => panic!("Expected LoadPage, got {:?}", other),
        }

        let decision = click.await.unwrap().unwrap();
        assert!(decision.prevents_default());
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_pass_through_never_reaches_router() {
        let (sender, mut receiver) = mpsc::channel(8);
        let interceptor = LinkInterceptor::new(RouterClient::new(sender));

        for href in ["http://a", "https://b", "#c", ""] {
            let decision = interceptor.on_click(Some(href)).await.unwrap();
            assert_eq!(decision, LinkDecision::PassThrough);
        }
        assert!(receiver.try_recv().is_err());
    }
}
