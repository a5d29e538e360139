use crate::{AppState, pages};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Marketing, catalog and password-recovery pages. The access controller never
/// redirects these, whatever the cookies say.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness check for the load balancer.
        .route("/health", get(|| async { "ok" }))
        .route("/", get(pages::home))
        .route("/shop", get(pages::shop))
        .route("/products", get(pages::products))
        // GET /product/{slug}
        // Exactly one segment after /product; deeper paths fall through to the 404 page.
        .route("/product/{slug}", get(pages::product_detail))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        // Password recovery is reachable signed in or not.
        .route("/forgot-password", get(pages::forgot_password))
        .route("/reset-password", get(pages::reset_password))
}
