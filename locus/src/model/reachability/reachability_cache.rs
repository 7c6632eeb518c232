use super::ReachabilityCacheKey;
use crate::model::clock::Clock;
use geo::MultiPolygon;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// a stored isochrone and the time it was inserted.
#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub polygon: Arc<MultiPolygon<f64>>,
    pub inserted_at: Instant,
}

/// one key's slot. the cell stays empty while a fetch is in flight or after a
/// fetch failed, so the next caller retries instead of seeing a poisoned value.
#[derive(Default)]
struct CacheSlot {
    entry: OnceCell<CacheEntry>,
}

impl CacheSlot {
    fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.entry
            .get()
            .map(|e| now.saturating_duration_since(e.inserted_at) >= ttl)
            .unwrap_or(false)
    }
}

/// an empty slot that no caller holds is left over from a failed fetch.
fn is_abandoned(slot: &Arc<CacheSlot>) -> bool {
    !slot.entry.initialized() && Arc::strong_count(slot) == 1
}

/// memoizes isochrones with a fixed time-to-live.
///
/// at most one upstream fetch runs per key at a time: concurrent callers for
/// the same key wait on the first caller's fetch and share its result.
/// expired entries are evicted lazily whenever the cache is consulted.
pub struct ReachabilityCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<ReachabilityCacheKey, Arc<CacheSlot>>>,
}

impl ReachabilityCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> ReachabilityCache {
        ReachabilityCache {
            ttl,
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// returns the cached isochrone for `key`, running `fetch` to populate it
    /// on a miss. a failed fetch is returned to the caller and not stored.
    pub async fn get_or_fetch<F, Fut, E>(
        &self,
        key: ReachabilityCacheKey,
        fetch: F,
    ) -> Result<Arc<MultiPolygon<f64>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<MultiPolygon<f64>, E>>,
    {
        let slot = self.slot(&key);
        if let Some(entry) = slot.entry.get() {
            log::debug!("reachability cache hit for {key}");
            return Ok(entry.polygon.clone());
        }
        let clock = &self.clock;
        let label = &key;
        let result = slot
            .entry
            .get_or_try_init(|| async move {
                log::debug!("reachability cache miss for {label}");
                let polygon = fetch().await?;
                Ok::<CacheEntry, E>(CacheEntry {
                    polygon: Arc::new(polygon),
                    inserted_at: clock.now(),
                })
            })
            .await
            .map(|entry| entry.polygon.clone());
        if result.is_err() {
            drop(slot);
            self.release(&key);
        }
        result
    }

    /// number of stored isochrones, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        slots
            .values()
            .filter(|slot| slot.entry.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// evicts every expired entry and any slot left behind by a failed fetch,
    /// returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Self::evict(&mut slots, now, self.ttl)
    }

    fn slot(&self, key: &ReachabilityCacheKey) -> Arc<CacheSlot> {
        let now = self.clock.now();
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        Self::evict(&mut slots, now, self.ttl);
        slots.entry(key.clone()).or_default().clone()
    }

    /// removes `key`'s slot after a failed fetch unless another caller is
    /// still waiting on it.
    fn release(&self, key: &ReachabilityCacheKey) {
        let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
        if slots.get(key).is_some_and(is_abandoned) {
            slots.remove(key);
        }
    }

    fn evict(
        slots: &mut HashMap<ReachabilityCacheKey, Arc<CacheSlot>>,
        now: Instant,
        ttl: Duration,
    ) -> usize {
        let before = slots.len();
        slots.retain(|_, slot| !slot.is_expired(now, ttl) && !is_abandoned(slot));
        let evicted = before - slots.len();
        if evicted > 0 {
            log::debug!("evicted {evicted} expired reachability cache entries");
        }
        evicted
    }
}
