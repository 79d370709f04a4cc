//! # Fragment Router Demo
//!
//! Runs the router headless against a site directory and clicks through the links of the
//! shell's header, navigation and footer, logging every decision.
//!
//! ```bash
//! RUST_LOG=info cargo run -- path/to/site
//! cargo run -- path/to/site --defer profile   # next run starts on "profile"
//! ```
//!
//! The site directory holds `pages/<route>/{index.html,style.css,script.js}` and an
//! optional `site.toml` (see [`SiteConfig`]). The deferred route is kept in `.state/`.

use clap::Parser;
use fragment_router::config::SiteConfig;
use fragment_router::fetch::{FsFetcher, ResourceFetcher};
use fragment_router::host::{HostEvent, MemoryHost};
use fragment_router::lifecycle::tracing::setup_tracing;
use fragment_router::lifecycle::SiteApp;
use fragment_router::model::Route;
use fragment_router::signal::{DeferredRouteSignal, FileStorage};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};

/// Link targets found in the shell, in document order.
const SHELL_LINKS: [&str; 8] = [
    "home",
    "contacts",
    "about",
    "profile",
    "search",
    "https://facebook.com/Mulheres.Tech",
    "#top",
    "policies",
];

/// Walk a fragment site headless.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Site directory holding `pages/` and an optional `site.toml`
    #[arg(default_value = ".")]
    site: PathBuf,

    /// Configuration file path (defaults to `<site>/site.toml`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Store a route to open on the next run, then exit
    #[arg(long)]
    defer: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let args = Args::parse();
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| args.site.join("site.toml"));
    let config = SiteConfig::load(config_path).map_err(|e| e.to_string())?;
    let storage = FileStorage::new(args.site.join(".state"));

    if let Some(route) = args.defer {
        let route = Route::new(route).map_err(|e| e.to_string())?;
        DeferredRouteSignal::new(storage, config.signal_key.clone())
            .defer(&route)
            .map_err(|e| e.to_string())?;
        info!(%route, "Route deferred to next run");
        return Ok(());
    }

    info!(site = %args.site.display(), "Starting demo");

    let host = MemoryHost::new();
    let fetcher: Arc<dyn ResourceFetcher> = Arc::new(FsFetcher::new(&args.site));
    let app = SiteApp::start(config, host.clone(), fetcher, storage)
        .await
        .map_err(|e| e.to_string())?;

    for href in SHELL_LINKS {
        let span = info_span!("click", href);
        let decision = app
            .click(Some(href))
            .instrument(span)
            .await
            .map_err(|e| e.to_string())?;
        info!(href, ?decision, "Clicked");
    }

    app.router
        .set_title(Some("Contato"))
        .await
        .map_err(|e| e.to_string())?;

    // Give the last fragment a moment to arrive; a missing one never will.
    let settled = tokio::time::timeout(
        Duration::from_millis(500),
        host.wait_until(|doc| {
            let pushed = doc
                .events
                .iter()
                .rposition(|event| matches!(event, HostEvent::HistoryPushed(_)));
            let mounted = doc
                .events
                .iter()
                .rposition(|event| matches!(event, HostEvent::Mounted(_)));
            mounted > pushed
        }),
    )
    .await;
    if settled.is_err() {
        warn!("Timed out waiting for the last fragment");
    }

    let doc = host.snapshot();
    info!(
        location = ?doc.location,
        title = ?doc.title,
        stylesheet = ?doc.stylesheet,
        history = ?doc.history,
        mounts = doc.mounts(),
        "Final document"
    );

    app.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["fragment-router"]).unwrap();
        assert_eq!(args.site, PathBuf::from("."));
        assert_eq!(args.config, None);
        assert_eq!(args.defer, None);
    }

    #[test]
    fn test_args_site_and_defer() {
        let args =
            Args::try_parse_from(["fragment-router", "site", "--defer", "profile"]).unwrap();
        assert_eq!(args.site, PathBuf::from("site"));
        assert_eq!(args.defer.as_deref(), Some("profile"));
    }

    #[test]
    fn test_args_reject_extra_positional_and_unknown_flag() {
        assert!(Args::try_parse_from(["fragment-router", "a", "b"]).is_err());
        assert!(Args::try_parse_from(["fragment-router", "--bogus"]).is_err());

        let help = Args::try_parse_from(["fragment-router", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
