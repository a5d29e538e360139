//! Router Module Index
//!
//! Page routers are split by the route class the access controller assigns them, so
//! the file a route lives in says who may see it.

/// Marketing, catalog and password-recovery pages (always allowed).
pub mod public;

/// Login and registration (visitors with a token are sent home).
pub mod guest;

/// Customer pages (visitors without a token are sent to login).
pub mod protected;

/// Back-office pages (token holders without the admin role are sent to their dashboard).
pub mod admin;

/// JSON session endpoints under `/api/session` (never routed through the controller).
pub mod session;
