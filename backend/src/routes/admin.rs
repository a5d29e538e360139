use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Admin Router Module
///
/// The back-office, nested under `/admin`. The access controller only lets a token
/// holder through when the profile cookie says `role: "admin"`; a missing or
/// malformed profile is sent to the user dashboard.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin
        // Dashboard with store statistics.
        .route("/", get(pages::admin_dashboard))
        // GET /admin/items
        // Catalog management (create, edit, hide bouquets).
        .route("/items", get(pages::admin_items))
        // GET /admin/users
        // Customer accounts and roles.
        .route("/users", get(pages::admin_users))
}
