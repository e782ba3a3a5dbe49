use crate::cache::{CacheStats, PlanCache};
use crate::error::{AppError, Result};
use crate::models::OptimizeResponse;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Redis-backed plan cache. Plans are stored as JSON with `SET EX`.
pub struct RedisCacheService {
    connection: ConnectionManager,
    plan_cache_ttl: u64,
}

impl RedisCacheService {
    pub async fn new(redis_url: &str, plan_cache_ttl: u64) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::Cache(format!("Failed to connect to Redis: {}", e)))?;

        tracing::info!("Redis cache connection established");

        Ok(RedisCacheService {
            connection,
            plan_cache_ttl,
        })
    }
}

#[async_trait]
impl PlanCache for RedisCacheService {
    async fn get_cached_plan(&self, key: &str) -> Option<OptimizeResponse> {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<Option<String>> = conn.get(key).await;

        match result {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(plan) => {
                    tracing::debug!("Cache hit for plan: {}", key);
                    Some(plan)
                }
                Err(e) => {
                    tracing::warn!("Failed to deserialize cached plan: {}", e);
                    None
                }
            },
            Ok(None) => {
                tracing::debug!("Cache miss for plan: {}", key);
                None
            }
            Err(e) => {
                tracing::warn!("Redis error getting plan: {}", e);
                None
            }
        }
    }

    async fn cache_plan(&self, key: &str, plan: &OptimizeResponse) {
        let json = match serde_json::to_string(plan) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("Failed to serialize plan for cache: {}", e);
                return;
            }
        };

        let mut conn = self.connection.clone();
        let result: redis::RedisResult<()> = conn.set_ex(key, json, self.plan_cache_ttl).await;

        match result {
            Ok(()) => {
                tracing::debug!("Cached plan with TTL {}s: {}", self.plan_cache_ttl, key);
            }
            Err(e) => {
                tracing::warn!("Failed to cache plan: {}", e);
            }
        }
    }

    async fn get_stats(&self) -> CacheStats {
        let mut conn = self.connection.clone();
        let info: redis::RedisResult<String> =
            redis::cmd("INFO").arg("stats").query_async(&mut conn).await;

        match info {
            Ok(info_str) => CacheStats::from_counts(
                parse_info_value(&info_str, "keyspace_hits"),
                parse_info_value(&info_str, "keyspace_misses"),
                true,
            ),
            Err(_) => CacheStats::from_counts(0, 0, false),
        }
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.connection.clone();
        let result: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

fn parse_info_value(info: &str, key: &str) -> u64 {
    info.lines()
        .find(|line| line.starts_with(key))
        .and_then(|line| line.split(':').nth(1))
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keyspace_counters() {
        let info = "# Stats\r\ntotal_connections_received:12\r\nkeyspace_hits:42\r\nkeyspace_misses:8\r\n";
        assert_eq!(parse_info_value(info, "keyspace_hits"), 42);
        assert_eq!(parse_info_value(info, "keyspace_misses"), 8);
        assert_eq!(parse_info_value(info, "evicted_keys"), 0);
    }
}
