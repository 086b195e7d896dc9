use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use redis::Client;

use crate::domain::auth::errors::CacheError;
use crate::domain::auth::ports::RequestCounter;
use crate::domain::auth::ports::SessionCache;

/// Session cache backed by Redis `GET` / `SET EX`, also serving request
/// counters through `INCR` / `EXPIRE`.
///
/// The multiplexed connection is cheap to clone and pipelines concurrent
/// commands over one socket.
#[derive(Clone)]
pub struct RedisSessionCache {
    connection: MultiplexedConnection,
}

impl RedisSessionCache {
    pub fn new(connection: MultiplexedConnection) -> Self {
        Self { connection }
    }

    /// Open a client for `url` and establish the shared connection.
    ///
    /// # Errors
    /// * `ConnectionFailed` - URL invalid or server unreachable
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = Client::open(url).map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;
        let connection = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| CacheError::ConnectionFailed(e.to_string()))?;

        Ok(Self::new(connection))
    }
}

#[async_trait]
impl SessionCache for RedisSessionCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut connection = self.connection.clone();
        connection
            .get::<_, Option<Vec<u8>>>(key)
            .await
            .map_err(|e| CacheError::CommandFailed(e.to_string()))
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl_seconds: u64) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        connection
            .set_ex::<_, _, ()>(key, value, ttl_seconds)
            .await
            .map_err(|e| CacheError::CommandFailed(e.to_string()))
    }
}

#[async_trait]
impl RequestCounter for RedisSessionCache {
    async fn incr(&self, key: &str, window_seconds: u64) -> Result<u64, CacheError> {
        let mut connection = self.connection.clone();
        let count = connection
            .incr::<_, _, u64>(key, 1u64)
            .await
            .map_err(|e| CacheError::CommandFailed(e.to_string()))?;

        if count == 1 {
            let window = i64::try_from(window_seconds).unwrap_or(i64::MAX);
            connection
                .expire::<_, ()>(key, window)
                .await
                .map_err(|e| CacheError::CommandFailed(e.to_string()))?;
        }

        Ok(count)
    }
}
