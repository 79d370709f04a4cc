//! Pure data structures: routes, the page directory convention and the site identity.

pub mod route;
pub mod site;

pub use route::*;
pub use site::*;
