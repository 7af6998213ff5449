//! Server configuration resolved from the environment.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use taskdeck_core::auth::AuthConfig;
use taskdeck_core::auth::jwt::resolve_jwt_secret;
use taskdeck_core::cache::redis::{CacheConfig, DEFAULT_TTL};
use taskdeck_core::mail::MailConfig;
use taskdeck_core::store::StoreConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_DATABASE: &str = "taskdeck";
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 300;
pub const DEFAULT_RESET_TOKEN_TTL_SECS: u64 = 3600;
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Fully resolved API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    /// SMTP settings, absent when mail delivery is not configured.
    pub mail: Option<MailConfig>,
}

impl ApiConfig {
    /// Reads configuration from environment variables, applying defaults
    /// where the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env_or("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr.parse().map_err(|_| ConfigError::Invalid {
            name: "BIND_ADDR",
            value: bind_addr.clone(),
        })?;

        let store = StoreConfig {
            uri: env::var("MONGODB_URI").map_err(|_| ConfigError::Missing("MONGODB_URI"))?,
            database: env_or("MONGODB_DATABASE", DEFAULT_DATABASE),
        };

        let cache = CacheConfig {
            uri: env::var("REDIS_URI").map_err(|_| ConfigError::Missing("REDIS_URI"))?,
            password: env::var("REDIS_PASSWORD").ok(),
            default_ttl: std::time::Duration::from_secs(parse_env(
                "REDIS_EXPIRATION",
                DEFAULT_TTL.as_secs(),
            )?),
        };

        let auth = AuthConfig {
            jwt_secret: resolve_jwt_secret(),
            access_token_ttl: chrono::Duration::seconds(parse_env(
                "JWT_ACCESS_TOKEN_EXPIRES",
                DEFAULT_ACCESS_TOKEN_TTL_SECS,
            )?),
            reset_token_ttl: std::time::Duration::from_secs(parse_env(
                "PASSWORD_RESET_TOKEN_EXPIRES",
                DEFAULT_RESET_TOKEN_TTL_SECS,
            )?),
            public_base_url: env_or("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL),
        };

        Ok(Self {
            bind_addr,
            store,
            cache,
            auth,
            mail: mail_from_env()?,
        })
    }
}

/// Mail delivery is optional: without MAIL_SERVER the server falls back to a
/// no-op mailer that only logs reset links.
fn mail_from_env() -> Result<Option<MailConfig>, ConfigError> {
    let Ok(server) = env::var("MAIL_SERVER") else {
        return Ok(None);
    };
    Ok(Some(MailConfig {
        server,
        port: parse_env("MAIL_PORT", 587)?,
        username: env::var("MAIL_USERNAME").ok(),
        password: env::var("MAIL_PASSWORD").ok(),
        from: env::var("MAIL_DEFAULT_SENDER")
            .map_err(|_| ConfigError::Missing("MAIL_DEFAULT_SENDER"))?,
    }))
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw.clone(),
        }),
        Err(_) => Ok(default),
    }
}
