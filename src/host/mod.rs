//! The document the router drives.
//!
//! The router never looks up the content region, the stylesheet link or the history
//! ambiently. It is handed a [`NavigationHost`] at startup and performs every mutation
//! through it, from its own task.

pub mod memory;

pub use memory::*;

/// Capability over the shell document.
///
/// Calls are synchronous: by the time a method returns the document reflects it.
/// The router owns its host exclusively, so implementations need no locking of their own
/// unless they share state with observers (as [`MemoryHost`] does).
pub trait NavigationHost: Send + 'static {
    /// Replaces the content region wholesale with `markup`.
    fn mount_fragment(&mut self, markup: &str);

    /// Points the dynamic stylesheet link at `href`.
    fn set_stylesheet(&mut self, href: &str);

    /// Sets the address bar to `path` and appends one history entry (empty state, empty title).
    fn push_history(&mut self, path: &str);

    fn scroll_to_top(&mut self);

    fn set_title(&mut self, title: &str);

    /// Runs a fragment's behavior script. `location` is where it was fetched from.
    fn execute_script(&mut self, location: &str, source: &str);
}
