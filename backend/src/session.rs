use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::models::{AuthSession, Role, UserProfile};

/// Cookie carrying the opaque API token. Its presence is what "authenticated" means
/// for page routing.
pub const AUTH_TOKEN_COOKIE: &str = "auth_token";
/// Cookie carrying the JSON-encoded `UserProfile`.
pub const USER_DATA_COOKIE: &str = "user_data";

/// SessionEvidence
///
/// The session state read from a request's cookies. It is a routing hint, not proof
/// of identity: the token is never validated here, and the remote API re-checks it on
/// every data call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionEvidence {
    token: Option<String>,
    profile: Option<UserProfile>,
}

impl SessionEvidence {
    /// from_jar
    ///
    /// Reads both session cookies from the request's cookie jar.
    pub fn from_jar(jar: &CookieJar) -> Self {
        Self::from_parts(
            jar.get(AUTH_TOKEN_COOKIE).map(|cookie| cookie.value()),
            jar.get(USER_DATA_COOKIE).map(|cookie| cookie.value()),
        )
    }

    /// from_parts
    ///
    /// Builds evidence from raw cookie values. An empty token counts as absent.
    /// A profile that fails to decode is dropped rather than reported.
    pub fn from_parts(token: Option<&str>, user_data: Option<&str>) -> Self {
        let token = token.filter(|value| !value.is_empty()).map(str::to_owned);
        let profile = user_data.and_then(decode_profile);

        Self { token, profile }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// The decoded role, if the profile cookie was usable.
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|profile| profile.role)
    }

    /// Missing or unparsable profiles are never admin.
    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    /// view
    ///
    /// The read-only projection handed to page handlers. It omits the token itself.
    pub fn view(&self) -> SessionView {
        SessionView {
            authenticated: self.has_token(),
            profile: self.profile.clone(),
        }
    }
}

fn decode_profile(raw: &str) -> Option<UserProfile> {
    match serde_json::from_str::<UserProfile>(raw) {
        Ok(profile) => Some(profile),
        Err(error) => {
            tracing::debug!(%error, "ignoring undecodable user_data cookie");
            None
        }
    }
}

/// SessionView
///
/// The per-request session context threaded explicitly into handlers. The access
/// guard builds it once and stores it in the request extensions; routes the guard
/// skips (the `/api` surface) rebuild it from the cookies on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionView {
    pub authenticated: bool,
    pub profile: Option<UserProfile>,
}

impl SessionView {
    pub fn is_admin(&self) -> bool {
        self.profile
            .as_ref()
            .is_some_and(|profile| profile.role == Role::Admin)
    }

    /// Name shown in the navigation bar, falling back to the e-mail address.
    pub fn display_name(&self) -> Option<&str> {
        let profile = self.profile.as_ref()?;
        profile.name.as_deref().or(profile.email.as_deref())
    }
}

impl<S> FromRequestParts<S> for SessionView
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(view) = parts.extensions.get::<SessionView>() {
            return Ok(view.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        Ok(SessionEvidence::from_jar(&jar).view())
    }
}

// --- Cookie Writers ---

/// issue_session_cookies
///
/// Stores a fresh login in the two session cookies. The token is HttpOnly; the
/// profile stays readable by page scripts (favorites toast, navigation).
pub fn issue_session_cookies(
    jar: CookieJar,
    session: &AuthSession,
    secure: bool,
) -> Result<CookieJar, serde_json::Error> {
    let profile = serde_json::to_string(&session.user)?;

    let token_cookie = Cookie::build((AUTH_TOKEN_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax);

    let profile_cookie = Cookie::build((USER_DATA_COOKIE, profile))
        .path("/")
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax);

    Ok(jar.add(token_cookie).add(profile_cookie))
}

/// clear_session_cookies
///
/// Expires both session cookies.
pub fn clear_session_cookies(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(AUTH_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(USER_DATA_COOKIE).path("/"))
}
