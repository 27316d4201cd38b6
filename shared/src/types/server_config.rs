use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Request bodies above this size are answered with `413`.
    pub max_body_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Rolling window. Every request pushes the expiry to `now + window_secs`.
    pub window_secs: u64,
    /// `SameSite` attribute for the session cookie (`Strict`, `Lax` or `None`).
    pub same_site: String,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_headers: Vec<String>,
    pub allowed_methods: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HostsConfig {
    /// Hosts compared against the request `Host` header with the port stripped.
    pub allowed: Vec<String>,
    /// Identity attached to every request that passes the host gate.
    pub request_identity: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC key used to sign and verify credentials.
    ///
    /// Prefer loading this via the `JWT_SECRET` environment variable. This
    /// field is the fallback for deployments that cannot inject env vars.
    ///
    /// **Minimum length:** 32 characters.
    pub jwt_secret: Option<String>,
    pub credential_lifetime_secs: u64,
    /// Subject embedded in credentials issued by `/login`.
    pub login_subject: String,
    /// Paths that require a verified credential before dispatch.
    pub protected_paths: Vec<String>,
    /// Also emit the fragment set as `Set-Cookie` headers on the login response.
    pub set_fragment_cookies: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailConfig {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub cors: CorsConfig,
    pub hosts: HostsConfig,
    pub auth: AuthConfig,
    pub database: DatabaseConfig,
    pub mail: MailConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ServerConfig {
    /// Full bind address, e.g. `"127.0.0.1:8080"`
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

impl AuthConfig {
    /// Resolve the signing secret with `JWT_SECRET` env-var taking priority over
    /// the config file field.
    ///
    /// Returns `None` when neither source is set (startup treats this as a
    /// hard error).
    pub fn resolved_jwt_secret(&self) -> Option<String> {
        std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| self.jwt_secret.clone())
            .filter(|s| !s.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "sessionId".to_string(),
            window_secs: 20 * 60,
            same_site: "Lax".to_string(),
            sweep_interval_secs: 60,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_headers: vec![
                "X-Requested-With".to_string(),
                "token".to_string(),
                "content-type".to_string(),
            ],
            allowed_methods: ["PUT", "POST", "GET", "DELETE", "OPTIONS"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

impl Default for HostsConfig {
    fn default() -> Self {
        Self {
            allowed: vec!["127.0.0.1".to_string()],
            request_identity: "user-kai".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            credential_lifetime_secs: 60 * 60,
            login_subject: "uid_1314520".to_string(),
            protected_paths: vec!["/cookie".to_string(), "/like".to_string()],
            set_fragment_cookies: true,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://tollgate.db?mode=rwc".to_string(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: "noreply@localhost".to_string(),
            to: Vec::new(),
            subject: "Hello from tollgate".to_string(),
            text: "Hello!".to_string(),
            html: "<p>Hello!</p>".to_string(),
        }
    }
}
