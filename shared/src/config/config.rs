use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

use crate::types::server_config::{AppConfig, ConfigError};

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path.display());

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: AppConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.session.cookie_name.trim().is_empty() {
        return Err(ConfigError::InvalidConfig(
            "session.cookie_name cannot be empty".into(),
        ));
    }

    if config.session.window_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "session.window_secs must be greater than 0".into(),
        ));
    }

    if !matches!(config.session.same_site.as_str(), "Strict" | "Lax" | "None") {
        return Err(ConfigError::InvalidConfig(format!(
            "session.same_site must be Strict, Lax or None (got {})",
            config.session.same_site
        )));
    }

    if config.auth.credential_lifetime_secs == 0 {
        return Err(ConfigError::InvalidConfig(
            "auth.credential_lifetime_secs must be greater than 0".into(),
        ));
    }

    if config.auth.login_subject.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "auth.login_subject cannot be empty".into(),
        ));
    }

    if config.hosts.allowed.is_empty() {
        return Err(ConfigError::InvalidConfig(
            "hosts.allowed must list at least one host".into(),
        ));
    }

    if let Some(path) = config
        .auth
        .protected_paths
        .iter()
        .find(|path| !path.starts_with('/'))
    {
        return Err(ConfigError::InvalidConfig(format!(
            "auth.protected_paths entries must start with '/' (got {})",
            path
        )));
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::InvalidConfig(
            "server.max_body_bytes must be greater than 0".into(),
        ));
    }

    // Secret must resolve (env var or config field) and be at least 32 chars.
    match config.auth.resolved_jwt_secret() {
        None => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be set via the JWT_SECRET env var or auth.jwt_secret config field"
                    .into(),
            ));
        }
        Some(secret) if secret.len() < 32 => {
            return Err(ConfigError::InvalidConfig(
                "jwt_secret must be at least 32 characters long".into(),
            ));
        }
        _ => {}
    }

    Ok(())
}
