//! Route access control for page requests.
//!
//! `table` classifies paths, `policy` turns a classification plus the session
//! cookies into a verdict, and `guard` is the axum middleware that applies it.

pub mod guard;
pub mod policy;
pub mod table;

pub use guard::{is_excluded, route_access_guard};
pub use policy::{Verdict, decide};
pub use table::{RouteClass, RouteClasses, classify};
