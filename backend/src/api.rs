use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::models::{
    ApiEnvelope, AuthSession, ForgotPasswordRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, Role, UserProfile,
};

// 1. Error Type
/// ApiError
///
/// Everything that can go wrong talking to the remote storefront API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a readable response.
    #[error("remote API unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    /// The API refused the request: an error status or `success: false`.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    /// The API answered `success: true` without the expected `data`.
    #[error("remote API returned no data")]
    EmptyPayload,
    /// The session could not be written to cookies.
    #[error("failed to encode session: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Rejected { status, .. } => *status,
            ApiError::Transport(_) | ApiError::EmptyPayload => StatusCode::BAD_GATEWAY,
            ApiError::Encoding(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "remote API call failed");
        } else {
            tracing::warn!(error = %self, "remote API rejected request");
        }

        (status, Json(ApiEnvelope::<()>::failure(self.to_string()))).into_response()
    }
}

// 2. AuthBackend Contract
/// AuthBackend
///
/// The slice of the remote API the storefront server calls itself. Swapping the HTTP
/// client for the in-memory mock keeps handler tests off the network.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError>;

    /// Invalidates the token on the API side.
    async fn logout(&self, token: &str) -> Result<(), ApiError>;

    /// Starts the reset flow; returns the API's user-facing message.
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<String, ApiError>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String, ApiError>;
}

/// ApiState
///
/// How the backend is shared through `AppState`.
pub type ApiState = Arc<dyn AuthBackend>;

// 3. The Real Implementation
/// HttpAuthBackend
///
/// reqwest client for `{API_URL}/auth/*`.
#[derive(Clone)]
pub struct HttpAuthBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/{}", self.base_url, path)
    }

    /// Sends a request and unwraps the `{success, data, message}` envelope.
    ///
    /// The status is checked before the body is read, so an error page that is not
    /// JSON still surfaces as a rejection. A 2xx envelope with `success: false` is a
    /// `BAD_REQUEST`.
    async fn call<T>(&self, request: reqwest::RequestBuilder) -> Result<ApiEnvelope<T>, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: rejection_status(status),
                message: failure_message(response).await,
            });
        }

        let envelope = response.json::<ApiEnvelope<T>>().await?;
        if !envelope.success {
            return Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: envelope
                    .message
                    .unwrap_or_else(|| "Request was rejected".to_string()),
            });
        }

        Ok(envelope)
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<ApiEnvelope<T>, ApiError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.call(self.client.post(self.endpoint(path)).json(body)).await
    }
}

/// 4xx codes are the browser's fault and pass through; anything else is an upstream
/// fault.
fn rejection_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// The envelope message of an error response, or a generic one when the body is not
/// an envelope.
async fn failure_message(response: reqwest::Response) -> String {
    let fallback = if response.status().is_client_error() {
        "Request was rejected"
    } else {
        "Remote API is unavailable"
    };

    response
        .json::<ApiEnvelope<serde_json::Value>>()
        .await
        .ok()
        .and_then(|envelope| envelope.message)
        .unwrap_or_else(|| fallback.to_string())
}

#[async_trait]
impl AuthBackend for HttpAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        self.post::<_, AuthSession>("login", request)
            .await?
            .data
            .ok_or(ApiError::EmptyPayload)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.post::<_, AuthSession>("register", request)
            .await?
            .data
            .ok_or(ApiError::EmptyPayload)
    }

    async fn logout(&self, token: &str) -> Result<(), ApiError> {
        let request = self.client.post(self.endpoint("logout")).bearer_auth(token);
        self.call::<serde_json::Value>(request).await?;
        Ok(())
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<String, ApiError> {
        let envelope = self
            .post::<_, serde_json::Value>("forgot-password", request)
            .await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Password reset instructions sent".to_string()))
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String, ApiError> {
        let envelope = self
            .post::<_, serde_json::Value>("reset-password", request)
            .await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Password has been reset".to_string()))
    }
}

// 4. The Mock Implementation (For Tests)
#[derive(Clone)]
struct MockAccount {
    email: String,
    password: String,
    profile: UserProfile,
}

/// MockAuthBackend
///
/// In-memory stand-in for the remote API, seeded with one administrator
/// (`admin@petals.test` / `admin123`) and one customer (`user@petals.test` / `user123`).
#[derive(Clone)]
pub struct MockAuthBackend {
    accounts: Arc<Mutex<Vec<MockAccount>>>,
    /// When true, every call is rejected as if the API refused it.
    pub should_fail: bool,
}

impl Default for MockAuthBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAuthBackend {
    pub fn new() -> Self {
        let seed = vec![
            MockAccount {
                email: "admin@petals.test".to_string(),
                password: "admin123".to_string(),
                profile: UserProfile {
                    id: Some("1".to_string()),
                    name: Some("Florence Admin".to_string()),
                    email: Some("admin@petals.test".to_string()),
                    role: Role::Admin,
                },
            },
            MockAccount {
                email: "user@petals.test".to_string(),
                password: "user123".to_string(),
                profile: UserProfile {
                    id: Some("2".to_string()),
                    name: Some("Rose Customer".to_string()),
                    email: Some("user@petals.test".to_string()),
                    role: Role::User,
                },
            },
        ];

        Self {
            accounts: Arc::new(Mutex::new(seed)),
            should_fail: false,
        }
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    fn check_available(&self) -> Result<(), ApiError> {
        if self.should_fail {
            return Err(ApiError::Rejected {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "Mock API Error: Simulation requested".to_string(),
            });
        }
        Ok(())
    }

    fn token_for(email: &str) -> String {
        format!("mock-token-{email}")
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<MockAccount>> {
        self.accounts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn invalid_credentials() -> ApiError {
    ApiError::Rejected {
        status: StatusCode::UNAUTHORIZED,
        message: "Invalid email or password".to_string(),
    }
}

#[async_trait]
impl AuthBackend for MockAuthBackend {
    async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        self.check_available()?;

        let accounts = self.lock();
        let account = accounts
            .iter()
            .find(|account| account.email == request.email && account.password == request.password)
            .ok_or_else(invalid_credentials)?;

        Ok(AuthSession {
            token: Self::token_for(&account.email),
            user: account.profile.clone(),
        })
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.check_available()?;

        let mut accounts = self.lock();
        if accounts.iter().any(|account| account.email == request.email) {
            return Err(ApiError::Rejected {
                status: StatusCode::CONFLICT,
                message: "Email is already registered".to_string(),
            });
        }

        let profile = UserProfile {
            id: Some((accounts.len() + 1).to_string()),
            name: Some(request.name.clone()),
            email: Some(request.email.clone()),
            role: Role::User,
        };

        accounts.push(MockAccount {
            email: request.email.clone(),
            password: request.password.clone(),
            profile: profile.clone(),
        });

        Ok(AuthSession {
            token: Self::token_for(&request.email),
            user: profile,
        })
    }

    async fn logout(&self, _token: &str) -> Result<(), ApiError> {
        self.check_available()
    }

    async fn forgot_password(&self, _request: &ForgotPasswordRequest) -> Result<String, ApiError> {
        self.check_available()?;
        // The real API answers the same way for unknown addresses.
        Ok("If that email is registered, a reset link is on its way".to_string())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<String, ApiError> {
        self.check_available()?;

        if request.token.is_empty() {
            return Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
                message: "Reset token is invalid or expired".to_string(),
            });
        }

        Ok("Password has been reset".to_string())
    }
}
