use std::env;

/// AppConfig
///
/// Holds the storefront server's configuration. Loaded once at startup and shared
/// read-only through the application state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and cookie hardening.
    pub env: Env,
    // Base URL of the remote storefront API (e.g. "https://api.petalsbyyou.com/api").
    pub api_base_url: String,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Directory holding the static bundle, favicon and public images.
    pub assets_dir: String,
    // Directory holding user uploads (product photos).
    pub uploads_dir: String,
}

/// Env
///
/// Defines the runtime context: local development or hardened production.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

const LOCAL_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Default for AppConfig {
    /// default
    ///
    /// Provides a non-panicking AppConfig for test state setup, without touching
    /// the process environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: LOCAL_API_URL.to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            assets_dir: "public".to_string(),
            uploads_dir: "uploads".to_string(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads all parameters from environment variables.
    ///
    /// # Panics
    /// Panics in production if `API_URL` is not set. A storefront that cannot reach its
    /// API must not start serving pages.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let api_base_url = match env {
            Env::Production => {
                env::var("API_URL").expect("FATAL: API_URL must be set in production.")
            }
            Env::Local => env::var("API_URL").unwrap_or_else(|_| LOCAL_API_URL.to_string()),
        };

        Self {
            env,
            // Trailing slashes are dropped so endpoint paths can be appended verbatim.
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            assets_dir: env::var("ASSETS_DIR").unwrap_or_else(|_| "public".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
        }
    }

    /// Session cookies carry the `Secure` attribute only outside local development.
    pub fn secure_cookies(&self) -> bool {
        self.env == Env::Production
    }
}
