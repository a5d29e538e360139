use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Session Schemas (Mirrored in the `user_data` cookie) ---

/// Role
///
/// The RBAC field carried in the profile cookie. Anything other than `"admin"` or
/// `"user"` decodes to `Unknown`, which the access controller treats as non-admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Unknown => "unknown",
        }
    }
}

/// UserProfile
///
/// The profile blob the remote API returns on login and that is serialized into the
/// `user_data` cookie. Only `role` is required. The display fields are read
/// best-effort, so an identifier sent as `_id`, as a number, or twice never costs
/// the visitor their role.
#[derive(Debug, Clone, PartialEq, Serialize, TS, ToSchema)]
#[ts(export)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[ts(type = "\"admin\" | \"user\"")]
    #[schema(value_type = String, example = "user")]
    pub role: Role,
}

/// The wire shape accepted for a profile before it is narrowed to `UserProfile`.
#[derive(Deserialize)]
struct RawProfile {
    id: Option<Value>,
    #[serde(rename = "_id")]
    object_id: Option<Value>,
    name: Option<Value>,
    email: Option<Value>,
    role: Role,
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawProfile::deserialize(deserializer)?;

        Ok(Self {
            id: raw
                .id
                .and_then(identifier)
                .or_else(|| raw.object_id.and_then(identifier)),
            name: raw.name.and_then(text),
            email: raw.email.and_then(text),
            role: raw.role,
        })
    }
}

fn identifier(value: Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        _ => None,
    }
}

/// AuthSession
///
/// Payload of a successful login or registration: the opaque token plus the profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

// --- Remote API Envelope ---

/// ApiEnvelope
///
/// The `{success, data, message}` wrapper used by every remote API response. The
/// session endpoints answer the browser in the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Body of POST /api/session/login. `callbackUrl` is the destination recorded by the
/// access controller when it bounced the visitor to the login page; it is never
/// forwarded to the remote API.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default, rename = "callbackUrl", skip_serializing)]
    pub callback_url: Option<String>,
}

/// RegisterRequest
///
/// Body of POST /api/session/register.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

// --- Response Payloads (Output Schemas) ---

/// SessionResponse
///
/// Returned after login/registration: the profile now stored in the cookie and the
/// path the browser should navigate to next.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub user: UserProfile,
    #[serde(rename = "redirectTo")]
    pub redirect_to: String,
}

/// SessionSnapshot
///
/// What the browser learns from GET /api/session: whether a token cookie is present
/// and the decoded profile, if any.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
}
