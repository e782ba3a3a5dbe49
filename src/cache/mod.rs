mod memory;
mod redis;

pub use self::memory::MemoryCacheService;
pub use self::redis::RedisCacheService;

use crate::config::FuelPlannerConfig;
use crate::models::OptimizeResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Storage for computed optimize responses.
///
/// Lookups and writes never fail the caller: backends log their errors and
/// behave as a miss.
#[async_trait]
pub trait PlanCache: Send + Sync {
    async fn get_cached_plan(&self, key: &str) -> Option<OptimizeResponse>;
    async fn cache_plan(&self, key: &str, plan: &OptimizeResponse);
    async fn get_stats(&self) -> CacheStats;
    async fn health_check(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}

/// Cache key for a start/end pair planned by `provider` under a given
/// planner configuration. Locations are compared case-insensitively,
/// ignoring surrounding whitespace.
pub fn plan_cache_key(
    provider: &str,
    start: &str,
    end: &str,
    config: &FuelPlannerConfig,
) -> String {
    let mut hasher = DefaultHasher::new();

    provider.hash(&mut hasher);
    start.trim().to_lowercase().hash(&mut hasher);
    end.trim().to_lowercase().hash(&mut hasher);

    config.tank_range_miles.to_bits().hash(&mut hasher);
    config.miles_per_gallon.to_bits().hash(&mut hasher);
    config.search_start_miles.to_bits().hash(&mut hasher);
    config.station_snap_miles.to_bits().hash(&mut hasher);
    config.max_sample_points.hash(&mut hasher);

    format!("plan:{:x}", hasher.finish())
}

/// Cache statistics for monitoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub connected: bool,
}

impl CacheStats {
    fn from_counts(hits: u64, misses: u64, connected: bool) -> Self {
        let hit_rate = if hits + misses > 0 {
            (hits as f64 / (hits + misses) as f64) * 100.0
        } else {
            0.0
        };

        CacheStats {
            hits,
            misses,
            hit_rate,
            connected,
        }
    }
}
