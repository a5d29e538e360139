use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Session API Router Module
///
/// JSON endpoints behind the login, registration and password forms, nested under
/// `/api/session`. The `/api` prefix is excluded from the access controller, so these
/// answer with envelopes instead of redirects.
pub fn session_routes() -> Router<AppState> {
    Router::new()
        // GET /api/session
        .route("/", get(handlers::current_session))
        // POST /api/session/login
        // Sets `auth_token` and `user_data` on success.
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        // POST /api/session/logout
        // Expires both cookies.
        .route("/logout", post(handlers::logout))
        .route("/forgot-password", post(handlers::forgot_password))
        .route("/reset-password", post(handlers::reset_password))
}
