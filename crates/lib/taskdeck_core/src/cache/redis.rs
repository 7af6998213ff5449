//! Redis-backed cache.
//!
//! A single `ConnectionManager` is created at startup and shared by clone
//! across requests; it reconnects internally on failure.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, IntoConnectionInfo};
use tracing::info;

use super::{Cache, CacheError};

/// Default entry lifetime when the `REDIS_EXPIRATION` option is absent.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// Connection settings for the cache store.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Redis connection URI, e.g. `redis://redis:6379/0`.
    pub uri: String,
    /// Password applied on top of the URI when the URI itself carries none.
    pub password: Option<String>,
    /// Default TTL for entries stored without an explicit one.
    pub default_ttl: Duration,
}

/// Shared Redis cache handle.
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
    default_ttl: Duration,
}

impl RedisCache {
    /// Connect to Redis and build the shared connection manager.
    pub async fn connect(config: &CacheConfig) -> Result<Self, CacheError> {
        let mut info = config.uri.as_str().into_connection_info()?;
        if info.redis.password.is_none() {
            info.redis.password = config.password.clone();
        }
        let client = Client::open(info)?;
        let manager = client.get_connection_manager().await?;
        info!(uri = %config.uri, "connected to cache store");
        Ok(Self {
            manager,
            default_ttl: config.default_ttl,
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn put(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut conn = self.manager.clone();
        let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn invalidate(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }
}
