#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Fragment Router
//!
//! > **Partial-page navigation for a shell-rendered site.**
//!
//! A site renders its header, navigation and footer once. Each logical page (a *route*)
//! is a directory holding a markup fragment, a stylesheet and a behavior script:
//!
//! ```text
//! pages/home/index.html
//! pages/home/style.css
//! pages/home/script.js
//! ```
//!
//! Clicking an internal link does not reload the shell. The router fetches the route's
//! fragment, swaps it into the content region, repoints the page stylesheet, runs the
//! script and records the route in the history.
//!
//! ## 🏗️ Design
//!
//! ### The Router Is an Actor
//! One Tokio task owns the document and applies every mutation in turn. Fetches run
//! concurrently in their own tasks and hand their results back to the router, so no two
//! fragment swaps ever interleave.
//!
//! ### Capabilities, Not Globals
//! The document is a [`NavigationHost`](host::NavigationHost), the network is a
//! [`ResourceFetcher`](fetch::ResourceFetcher), the cross-load storage is a
//! [`SignalStore`](signal::SignalStore). All three are injected at startup, which is also
//! what makes the router testable with [`MemoryHost`](host::MemoryHost) and
//! [`MockFetcher`](router::mock::MockFetcher).
//!
//! ### Races Are a Policy
//! When a slow fragment resolves after a newer navigation, the legacy behavior mounts it
//! anyway (last resolved wins). [`RacePolicy::LastIssuedWins`](config::RacePolicy)
//! aborts superseded fetches and discards their late results instead.
//!
//! ### Silent Failures
//! A missing fragment or script is logged and otherwise ignored: the content region keeps
//! what it had. Only a closed router or an invalid route reaches the caller.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`router`])
//! - **Role**: loads pages, sets titles, owns the host.
//! - **Key items**: [`RouterActor`](router::RouterActor), [`RouterClient`](router::RouterClient).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: bootstrap (deferred route, first load), interceptor install, shutdown.
//! - **Key items**: [`SiteApp`](lifecycle::SiteApp), [`setup_tracing`](lifecycle::tracing::setup_tracing).
//!
//! ### 3. The Click Path ([`interceptor`])
//! - **Role**: tells routable links from external links and anchors.
//! - **Key items**: [`LinkInterceptor`](interceptor::LinkInterceptor), [`LinkTarget`](interceptor::LinkTarget).
//!
//! ### 4. The Edges ([`host`], [`fetch`], [`signal`], [`config`], [`model`])
//! - **Role**: the injected capabilities, their in-crate implementations and the data
//!   they exchange.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Walk the demo navigation against a site directory
//! RUST_LOG=info cargo run -- path/to/site
//!
//! # Make the next run open "profile" first
//! cargo run -- path/to/site --defer profile
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod config;
pub mod fetch;
pub mod host;
pub mod interceptor;
pub mod lifecycle;
pub mod model;
pub mod router;
pub mod signal;
