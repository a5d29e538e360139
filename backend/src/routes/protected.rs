use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Protected Router Module
///
/// Customer pages that need a session token. Without one, the access controller
/// sends the visitor to `/login?callbackUrl=<path>`.
///
/// A token whose profile cookie is unreadable still reaches these pages; the data
/// each page loads comes from the remote API, which validates the token itself.
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        // --- Account ---
        .route("/user/dashboard", get(pages::user_dashboard))
        .route("/user/profile", get(pages::user_profile))
        // --- Shopping ---
        .route("/cart", get(pages::cart))
        .route("/favorites", get(pages::favorites))
        .route("/build-bouquet", get(pages::build_bouquet))
        .route("/checkout", get(pages::checkout))
        .route("/checkout/success", get(pages::checkout_success))
}
