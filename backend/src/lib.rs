use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Route access control: classification table, decision policy, dispatch guard.
pub mod access;
// Session cookies and the per-request session view.
pub mod session;
// Remote storefront API client.
pub mod api;
pub mod config;
pub mod handlers;
pub mod models;
pub mod pages;

// Page routers grouped by route class, plus the session API.
pub mod routes;
use routes::{admin, guest, protected, public, session as session_api};

// --- Public Re-exports ---

pub use api::{ApiState, HttpAuthBackend, MockAuthBackend};
pub use config::AppConfig;

/// ApiDoc
///
/// OpenAPI description of the JSON session endpoints, served under `/api/docs`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::login, handlers::register, handlers::logout,
        handlers::current_session, handlers::forgot_password, handlers::reset_password
    ),
    components(
        schemas(
            models::UserProfile, models::LoginRequest, models::RegisterRequest,
            models::ForgotPasswordRequest, models::ResetPasswordRequest,
            models::SessionResponse, models::SessionSnapshot,
        )
    ),
    tags(
        (name = "petals-web", description = "Petals By You storefront session API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable container for the remote API client and the configuration.
#[derive(Clone)]
pub struct AppState {
    /// Remote API boundary (real HTTP client or the in-memory mock).
    pub api: ApiState,
    pub config: AppConfig,
}

impl FromRef<AppState> for ApiState {
    fn from_ref(app_state: &AppState) -> ApiState {
        app_state.api.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles pages, the session API and static assets, then wraps everything in the
/// route access guard and the observability layers.
pub fn create_router(state: AppState) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    let assets_dir = state.config.assets_dir.clone();
    let uploads_dir = state.config.uploads_dir.clone();

    // 1. Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI lives under /api, outside the access controller.
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/session", session_api::session_routes())
        // Pages, one router per route class.
        .merge(public::public_routes())
        .merge(guest::guest_routes())
        .merge(protected::protected_routes())
        .nest("/admin", admin::admin_routes())
        // Static files. All of these prefixes are on the guard's exclusion list.
        .nest_service("/assets", ServeDir::new(format!("{assets_dir}/assets")))
        .nest_service("/public", ServeDir::new(&assets_dir))
        .nest_service("/uploads", ServeDir::new(&uploads_dir))
        .route_service("/favicon.ico", ServeFile::new(format!("{assets_dir}/favicon.ico")))
        .fallback(pages::not_found)
        .with_state(state);

    // 2. Route Access Control
    // Runs before any page handler; excluded paths pass through untouched.
    let guarded = base_router.layer(middleware::from_fn(access::route_access_guard));

    // 3. Observability and Correlation Layers (outermost)
    guarded.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(trace_span_logger)
                    .on_response(
                        DefaultOnResponse::new()
                            .level(Level::INFO)
                            .latency_unit(tower_http::LatencyUnit::Millis),
                    ),
            )
            .layer(PropagateRequestIdLayer::new(x_request_id)),
    )
}

/// trace_span_logger
///
/// Builds the per-request span, tagging it with the `x-request-id` set above so every
/// log line for one request (including the access decision) is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
