//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## Configuration
//!
//! Output uses the compact format without module prefixes (`with_target(false)`); the
//! structured fields (`route`, `navigation`, `location`) carry the context instead.
//! Verbosity comes from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Router Lifecycle**: startup, shutdown and the number of navigations issued
//! - **Navigations**: issued, mounted, superseded, failed
//! - **Scripts**: executed or failed behavior scripts
//! - **Bootstrap**: resumed deferred routes
//!
//! ## Usage Examples
//!
//! ```bash
//! # Navigations and failures
//! RUST_LOG=info cargo run -- site/
//!
//! # Resource locations, titles and discarded results
//! RUST_LOG=debug cargo run -- site/
//!
//! # Only the router
//! RUST_LOG=fragment_router::router=debug cargo run -- site/
//! ```
//!
//! ## Navigation Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Router started site="Blog IRS" policy=LastResolvedWins
//! INFO Navigation issued route=home navigation=1
//! INFO Site started site="Blog IRS"
//! INFO Fragment mounted route=home navigation=1
//! INFO Navigation issued route=contacts navigation=2
//! WARN Fragment fetch failed, content unchanged route=contacts navigation=2 error=Resource not found: pages/contacts/index.html
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
