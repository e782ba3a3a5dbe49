use crate::cache::{CacheStats, PlanCache};
use crate::models::OptimizeResponse;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory plan cache backed by moka with TTL and bounded capacity
pub struct MemoryCacheService {
    plans: Cache<String, Arc<OptimizeResponse>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl MemoryCacheService {
    pub fn new(ttl_seconds: u64, max_capacity: u64) -> Self {
        let plans = Cache::builder()
            .time_to_live(Duration::from_secs(ttl_seconds))
            .max_capacity(max_capacity)
            .build();

        MemoryCacheService {
            plans,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl PlanCache for MemoryCacheService {
    async fn get_cached_plan(&self, key: &str) -> Option<OptimizeResponse> {
        match self.plans.get(key).await {
            Some(plan) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache hit for plan: {}", key);
                Some((*plan).clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Memory cache miss for plan: {}", key);
                None
            }
        }
    }

    async fn cache_plan(&self, key: &str, plan: &OptimizeResponse) {
        self.plans
            .insert(key.to_string(), Arc::new(plan.clone()))
            .await;
        tracing::debug!(
            "Memory cached plan with {} stops: {}",
            plan.number_of_stops,
            key
        );
    }

    async fn get_stats(&self) -> CacheStats {
        CacheStats::from_counts(
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
            true,
        )
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
