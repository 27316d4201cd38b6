pub mod database;
pub mod handlers;
pub mod mail;
pub mod pipeline;
pub mod security;
pub mod tower_middle;
pub mod utils;

use std::sync::Arc;

use anyhow::{Result, anyhow};

use tollgate_shared::types::AppConfig;

use crate::database::UserStore;
use crate::mail::Mailer;
use crate::security::{ClaimsCodec, SessionStore};

pub use crate::pipeline::RequestPipeline;

/// Everything a request handler may reach. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub sessions: SessionStore,
    pub codec: Arc<ClaimsCodec>,
    pub users: UserStore,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Build state from a validated config. Fails when no signing secret resolves.
    pub fn new(config: AppConfig, users: UserStore, mailer: Arc<dyn Mailer>) -> Result<Self> {
        let secret = config
            .auth
            .resolved_jwt_secret()
            .ok_or_else(|| anyhow!("No signing secret: set JWT_SECRET or auth.jwt_secret"))?;

        let codec = ClaimsCodec::new(secret.as_bytes(), config.auth.credential_lifetime_secs);
        let sessions = SessionStore::new(config.session.window_secs);

        Ok(Self {
            config: Arc::new(config),
            sessions,
            codec: Arc::new(codec),
            users,
            mailer,
        })
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("sessions", &self.sessions)
            .field("codec", &self.codec)
            .field("users", &self.users)
            .finish_non_exhaustive()
    }
}
