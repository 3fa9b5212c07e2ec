use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppError;
use crate::error::AppResult;

/// Keys for cached catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Single game by catalog id
    Game(u64),
    /// More-like-this results, keyed by source document ids and result size
    Similar(String, usize),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Game(bg_id) => write!(f, "game:{}", bg_id),
            CacheKey::Similar(like, size) => write!(f, "similar:{}:{}", like, size),
        }
    }
}

/// Creates a Redis client for caching
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

struct PendingWrite {
    key: String,
    value: String,
    ttl: u64,
}

/// Write-behind Redis cache.
///
/// Reads go straight to Redis; writes are queued onto a background task so
/// a slow cache never delays an API response.
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<PendingWrite>,
}

/// Handle for shutting down the background writer, flushing queued writes.
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates the cache and spawns its writer task. Must be called from
    /// within a tokio runtime.
    pub fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    /// Drains queued writes; on shutdown, flushes whatever is left before
    /// exiting.
    async fn writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<PendingWrite>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::debug!("Cache writer task started");

        loop {
            tokio::select! {
                Some(entry) = write_rx.recv() => {
                    if let Err(e) = Self::write_entry(&client, entry).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");
                    while let Ok(entry) = write_rx.try_recv() {
                        if let Err(e) = Self::write_entry(&client, entry).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }
                    break;
                }
            }
        }
    }

    async fn write_entry(client: &Client, entry: PendingWrite) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(entry.key, entry.value, entry.ttl).await?;
        Ok(())
    }

    /// Retrieves and deserializes a cached value; `None` on a miss.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(
        &self,
        key: &CacheKey,
    ) -> AppResult<Option<T>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(format!("{}", key)).await?;

        match cached {
            Some(json) => {
                let data = serde_json::from_str(&json).map_err(|e| {
                    AppError::Internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(data))
            }
            None => Ok(None),
        }
    }

    /// Queues a value for the background writer and returns immediately.
    /// Serialization failures and send failures are logged, never surfaced;
    /// the cache is an optimization, not a source of truth.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let entry = PendingWrite {
            key: format!("{}", key),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(entry) {
            tracing::error!(error = %e, "Failed to queue cache write");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_display_game() {
        let key = CacheKey::Game(224517);
        assert_eq!(format!("{}", key), "game:224517");
    }

    #[test]
    fn test_cache_key_display_similar() {
        let key = CacheKey::Similar("abc,def".to_string(), 4);
        assert_eq!(format!("{}", key), "similar:abc,def:4");
    }

    #[test]
    fn test_cache_keys_are_distinct_per_game() {
        assert_ne!(
            format!("{}", CacheKey::Game(1)),
            format!("{}", CacheKey::Game(2))
        );
    }

    // Redis is unreachable here; queued writes fail with a logged error,
    // and shutdown must still drain the queue and return.
    #[tokio::test]
    async fn test_shutdown_returns_with_writes_queued() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, writer) = Cache::new(client);

        cache.set_in_background(&CacheKey::Game(1), &"cached", 60);
        cache.set_in_background(&CacheKey::Game(2), &"cached", 60);

        tokio::time::timeout(std::time::Duration::from_secs(5), writer.shutdown())
            .await
            .expect("shutdown should not hang");
    }
}
