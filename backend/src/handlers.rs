use crate::{
    AppState,
    access::policy::post_auth_redirect,
    api::ApiError,
    models::{
        ApiEnvelope, AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest, SessionResponse, SessionSnapshot,
    },
    session::{SessionEvidence, SessionView, clear_session_cookies, issue_session_cookies},
};
use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;

type SessionResult = Result<(CookieJar, Json<ApiEnvelope<SessionResponse>>), ApiError>;

/// establish_session
///
/// Shared tail of login and registration: writes both session cookies and tells the
/// browser where to go next.
fn establish_session(
    state: &AppState,
    jar: CookieJar,
    session: AuthSession,
    callback: Option<&str>,
) -> SessionResult {
    let jar = issue_session_cookies(jar, &session, state.config.secure_cookies())?;
    let redirect_to = post_auth_redirect(session.user.role, callback);

    tracing::info!(role = session.user.role.as_str(), redirect_to = %redirect_to, "session established");

    Ok((
        jar,
        Json(ApiEnvelope::ok(SessionResponse {
            user: session.user,
            redirect_to,
        })),
    ))
}

// --- Handlers ---

/// login
///
/// [Public Route] Exchanges credentials for an API token and stores the session in
/// cookies. A safe `callbackUrl` recorded by the access controller wins over the
/// role's home page.
#[utoipa::path(
    post,
    path = "/api/session/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session cookies set; envelope data carries the profile and redirect", body = SessionResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 502, description = "Remote API unavailable")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> SessionResult {
    let session = state.api.login(&payload).await?;
    establish_session(&state, jar, session, payload.callback_url.as_deref())
}

/// register
///
/// [Public Route] Creates an account through the remote API and signs the visitor in.
#[utoipa::path(
    post,
    path = "/api/session/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created and session cookies set", body = SessionResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<RegisterRequest>,
) -> SessionResult {
    let session = state.api.register(&payload).await?;
    establish_session(&state, jar, session, None)
}

/// logout
///
/// [Public Route] Clears the session cookies. The remote logout is best effort: a
/// failure there is logged and the cookies are cleared anyway.
#[utoipa::path(
    post,
    path = "/api/session/logout",
    responses((status = 200, description = "Session cookies cleared"))
)]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<ApiEnvelope<()>>) {
    let evidence = SessionEvidence::from_jar(&jar);

    if let Some(token) = evidence.token() {
        if let Err(error) = state.api.logout(token).await {
            tracing::warn!(%error, "remote logout failed; clearing cookies anyway");
        }
    }

    (
        clear_session_cookies(jar),
        Json(ApiEnvelope::ok_with_message((), "Logged out")),
    )
}

/// current_session
///
/// [Public Route] Reports what the cookies say about the visitor. Like the access
/// controller, this is a hint for the UI, not an authorization check.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Current session snapshot", body = SessionSnapshot))
)]
pub async fn current_session(session: SessionView) -> Json<ApiEnvelope<SessionSnapshot>> {
    Json(ApiEnvelope::ok(SessionSnapshot {
        authenticated: session.authenticated,
        user: session.profile,
    }))
}

/// forgot_password
///
/// [Public Route] Relays a reset request to the remote API.
#[utoipa::path(
    post,
    path = "/api/session/forgot-password",
    request_body = ForgotPasswordRequest,
    responses((status = 200, description = "Reset instructions sent"))
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiEnvelope<()>>, ApiError> {
    let message = state.api.forgot_password(&payload).await?;
    Ok(Json(ApiEnvelope::ok_with_message((), message)))
}

/// reset_password
///
/// [Public Route] Completes a reset with the token from the e-mailed link.
#[utoipa::path(
    post,
    path = "/api/session/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Reset token invalid or expired")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiEnvelope<()>>, ApiError> {
    let message = state.api.reset_password(&payload).await?;
    Ok(Json(ApiEnvelope::ok_with_message((), message)))
}
