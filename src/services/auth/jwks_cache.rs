//! TTL cache in front of a [`KeySetProvider`].
//!
//! Readers share the cached `Arc<KeySet>`. When the entry is missing or
//! expired, one caller refreshes while the others wait on `refresh` and then
//! reuse its result. A failed refresh leaves the previous entry untouched and
//! fails every caller that waited on it; only later callers fetch again.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use tokio::{
    sync::{Mutex, RwLock},
    time::Instant,
};
use tracing::{debug, warn};

use crate::services::auth::jwks::{KeySet, KeySetError, KeySetProvider};

#[derive(Debug)]
struct CachedKeySet {
    keys: Arc<KeySet>,
    fetched_at: Instant,
}

#[derive(Debug)]
pub struct CachedKeySetProvider<P> {
    inner: P,
    ttl: Duration,
    cache: RwLock<Option<CachedKeySet>>,
    refresh: Mutex<()>,
    /// Completed refresh attempts, successful or not.
    attempts: AtomicU64,
}

impl<P: KeySetProvider> CachedKeySetProvider<P> {
    /// A zero `ttl` disables caching: every call goes to `inner`.
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: RwLock::new(None),
            refresh: Mutex::new(()),
            attempts: AtomicU64::new(0),
        }
    }

    async fn fresh(&self) -> Option<Arc<KeySet>> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| Arc::clone(&entry.keys))
    }
}

#[async_trait]
impl<P: KeySetProvider> KeySetProvider for CachedKeySetProvider<P> {
    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, KeySetError> {
        if self.ttl.is_zero() {
            return self.inner.fetch_key_set().await;
        }

        if let Some(keys) = self.fresh().await {
            return Ok(keys);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let _refresh = self.refresh.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(keys) = self.fresh().await {
            debug!("jwks refreshed by a concurrent caller");
            return Ok(keys);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            return Err(KeySetError::RefreshFailed);
        }

        let fetched = self.inner.fetch_key_set().await;
        self.attempts.fetch_add(1, Ordering::Release);
        let keys = fetched.inspect_err(|e| warn!(error = %e, "jwks refresh failed"))?;
        *self.cache.write().await = Some(CachedKeySet {
            keys: Arc::clone(&keys),
            fetched_at: Instant::now(),
        });

        Ok(keys)
    }
}
