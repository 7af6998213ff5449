//! Cache adapter.
//!
//! The task and credential services consume the [`Cache`] trait so the
//! backend stays replaceable: [`RedisCache`] in production, [`MemoryCache`]
//! in tests. Values are opaque strings; structured values go through the
//! tagged codec in [`codec`] via [`CacheExt`].

pub mod codec;
pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use memory::MemoryCache;
pub use redis::{CacheConfig, RedisCache};

/// Cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),

    #[error("cache codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl From<::redis::RedisError> for CacheError {
    fn from(e: ::redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// Key-value cache with per-entry expiration.
///
/// A `ttl` of `None` uses the backend's configured default.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn put(&self, key: &str, value: &str, ttl: Option<Duration>)
    -> Result<(), CacheError>;

    async fn invalidate(&self, key: &str) -> Result<(), CacheError>;
}

/// Typed helpers over any [`Cache`].
///
/// Decoding is strict and schema-driven: payloads deserialize into a known
/// type or fail. Cached content is treated as untrusted input — it is never
/// evaluated, only parsed.
#[async_trait]
pub trait CacheExt: Cache {
    async fn get_json<T>(&self, key: &str) -> Result<Option<T>, CacheError>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn put_json<T>(
        &self,
        key: &str,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<(), CacheError>
    where
        T: Serialize + Sync,
    {
        let raw = serde_json::to_string(value)?;
        self.put(key, &raw, ttl).await
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}
