use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use super::policy::{Verdict, decide};
use super::table::matches_prefix;
use crate::session::SessionEvidence;

/// Path prefixes that never reach the access controller: the JSON API surface, the
/// static bundle, user uploads and public images.
pub const EXCLUDED_PREFIXES: &[&str] = &["/api", "/assets", "/uploads", "/public"];

/// Single files that bypass the controller.
pub const EXCLUDED_FILES: &[&str] = &["/favicon.ico"];

/// is_excluded
///
/// Dispatch-layer allow-list, checked before any access decision is made.
pub fn is_excluded(path: &str) -> bool {
    EXCLUDED_FILES.contains(&path)
        || EXCLUDED_PREFIXES
            .iter()
            .any(|prefix| matches_prefix(path, prefix))
}

/// route_access_guard
///
/// Middleware wrapping the whole router. Excluded paths pass straight through. Every
/// other request gets an access decision from its cookies: redirects are answered
/// here with 307, allowed requests continue with a `SessionView` in their extensions
/// so handlers never re-read the cookies.
pub async fn route_access_guard(jar: CookieJar, mut request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();

    if is_excluded(&path) {
        return next.run(request).await;
    }

    let session = SessionEvidence::from_jar(&jar);
    let verdict = decide(&path, &session);

    tracing::debug!(
        path = %path,
        has_token = session.has_token(),
        role = session.role().map(|role| role.as_str()).unwrap_or("none"),
        verdict = ?verdict,
        "route access decision"
    );

    match verdict {
        Verdict::Allow => {
            request.extensions_mut().insert(session.view());
            next.run(request).await
        }
        Verdict::Redirect(target) => Redirect::temporary(&target).into_response(),
    }
}
