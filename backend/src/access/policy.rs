use url::form_urlencoded;

use super::table::{RouteClass, classify};
use crate::models::Role;
use crate::session::SessionEvidence;

/// Landing page for administrators.
pub const ADMIN_HOME: &str = "/admin";
/// Landing page for everyone else with a session.
pub const USER_HOME: &str = "/user/dashboard";
/// Login surface unauthenticated visitors are sent to.
pub const LOGIN_PATH: &str = "/login";
/// Query parameter that records where a bounced visitor was headed.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// Verdict
///
/// Outcome of one access decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Forward the request untouched.
    Allow,
    /// Answer with a redirect to the contained absolute path.
    Redirect(String),
}

/// decide
///
/// The route access decision. Rules are evaluated in order and the first one that
/// fires wins:
///
/// 1. A token on a login/register page is sent to the role's home.
/// 2. No token on a protected page is sent to login, remembering the destination.
/// 3. A token on an admin page without an admin profile is sent to the user dashboard.
/// 4. Everything else is allowed.
///
/// A token with an unreadable profile still reaches protected pages through rule 4;
/// the remote API is what actually rejects a bad token.
pub fn decide(path: &str, session: &SessionEvidence) -> Verdict {
    let classes = classify(path);

    if session.has_token() && classes.contains(RouteClass::AuthOnly) {
        return Verdict::Redirect(home_for(session.role()).to_string());
    }

    if !session.has_token() && classes.contains(RouteClass::Protected) {
        return Verdict::Redirect(login_redirect(path));
    }

    if session.has_token() && classes.contains(RouteClass::AdminOnly) && !session.is_admin() {
        return Verdict::Redirect(USER_HOME.to_string());
    }

    Verdict::Allow
}

/// The default destination for a signed-in visitor.
pub fn home_for(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => ADMIN_HOME,
        _ => USER_HOME,
    }
}

/// login_redirect
///
/// Builds `/login?callbackUrl=<path>`. Each segment is query-encoded on its own and
/// the separators stay literal, so `/cart` round-trips as `callbackUrl=/cart`.
pub fn login_redirect(path: &str) -> String {
    let encoded = path
        .split('/')
        .map(|segment| form_urlencoded::byte_serialize(segment.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join("/");

    format!("{LOGIN_PATH}?{CALLBACK_PARAM}={encoded}")
}

/// is_safe_callback
///
/// Only same-site absolute paths are honored after login. Protocol-relative
/// (`//host`) and backslash tricks (`/\host`) are rejected.
pub fn is_safe_callback(candidate: &str) -> bool {
    candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.starts_with("/\\")
        && !candidate.chars().any(char::is_control)
}

/// post_auth_redirect
///
/// Where the browser goes after a successful login or registration: the recorded
/// callback when it is safe, otherwise the role's home.
pub fn post_auth_redirect(role: Role, callback: Option<&str>) -> String {
    match callback.filter(|candidate| is_safe_callback(candidate)) {
        Some(target) => target.to_string(),
        None => home_for(Some(role)).to_string(),
    }
}
