use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Guest Router Module
///
/// Login and registration. A visitor who already holds a token is redirected to
/// their home page by the access controller before these handlers run.
pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(pages::login))
        .route("/register", get(pages::register))
}
