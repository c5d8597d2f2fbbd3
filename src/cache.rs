use crate::schema::FeedSnapshot;
use log::{debug, info};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct CachedSnapshot {
    snapshot: Arc<FeedSnapshot>,
    fetched_at: Instant,
}

/// Process-wide cache of the last feed load.
///
/// The lock is held while a reload runs, so renders that miss at the same
/// time wait for the one fetch instead of starting their own.
pub struct FeedCache {
    ttl: Duration,
    entry: Mutex<Option<CachedSnapshot>>,
}

impl FeedCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached snapshot while it is younger than the TTL,
    /// otherwise runs `load` and caches its result.
    pub async fn get_or_refresh<F, Fut>(&self, load: F) -> Arc<FeedSnapshot>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = FeedSnapshot>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref() {
            if cached.fetched_at.elapsed() < self.ttl {
                debug!(
                    "Reusing feed snapshot fetched {:?} ago",
                    cached.fetched_at.elapsed()
                );
                return Arc::clone(&cached.snapshot);
            }
        }

        info!("Feed cache empty or expired, reloading");
        let snapshot = Arc::new(load().await);
        *entry = Some(CachedSnapshot {
            snapshot: Arc::clone(&snapshot),
            fetched_at: Instant::now(),
        });
        snapshot
    }

    /// Drops the cached snapshot so the next render refetches.
    pub async fn invalidate(&self) {
        info!("Feed cache invalidated");
        *self.entry.lock().await = None;
    }

    pub async fn is_fresh(&self) -> bool {
        self.entry
            .lock()
            .await
            .as_ref()
            .is_some_and(|cached| cached.fetched_at.elapsed() < self.ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_load(counter: &AtomicUsize) -> impl Future<Output = FeedSnapshot> + '_ {
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            FeedSnapshot::new(Vec::new(), Vec::new())
        }
    }

    #[tokio::test]
    async fn test_reuses_fresh_snapshot() {
        let cache = FeedCache::new(Duration::from_secs(300));
        let loads = AtomicUsize::new(0);

        let first = cache.get_or_refresh(|| counting_load(&loads)).await;
        let second = cache.get_or_refresh(|| counting_load(&loads)).await;

        assert_eq!(loads.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.is_fresh().await);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache = FeedCache::new(Duration::from_secs(300));
        let loads = AtomicUsize::new(0);

        cache.get_or_refresh(|| counting_load(&loads)).await;
        cache.invalidate().await;
        assert!(!cache.is_fresh().await);

        cache.get_or_refresh(|| counting_load(&loads)).await;
        assert_eq!(loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let cache = FeedCache::new(Duration::ZERO);
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            cache.get_or_refresh(|| counting_load(&loads)).await;
        }
        assert_eq!(loads.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrent_misses_fetch_once() {
        let cache = Arc::new(FeedCache::new(Duration::from_secs(300)));
        let loads = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_refresh(|| async {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        loads.fetch_add(1, Ordering::SeqCst);
                        FeedSnapshot::new(Vec::new(), Vec::new())
                    })
                    .await
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
