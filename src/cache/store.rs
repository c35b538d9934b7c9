use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::foundation::error::PlotshotError;

/// Default entry ceiling.
pub const MAX_CACHE_ENTRIES: usize = 100;
/// Default entry lifetime.
pub const CACHE_TTL: Duration = Duration::from_secs(10 * 60);
/// Default interval between background sweeps.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Content type of everything this cache hands out.
pub const IMAGE_CONTENT_TYPE: &str = "image/png";

/// Cache configuration. Fixed for the lifetime of a cache.
#[derive(Clone, Copy, Debug)]
pub struct RenderCacheOpts {
    /// Maximum number of retained entries; at least 1.
    pub max_entries: usize,
    /// Age after which the sweep drops an entry.
    pub ttl: Duration,
    /// Background sweep period.
    pub sweep_interval: Duration,
}

impl Default for RenderCacheOpts {
    fn default() -> Self {
        Self {
            max_entries: MAX_CACHE_ENTRIES,
            ttl: CACHE_TTL,
            sweep_interval: SWEEP_INTERVAL,
        }
    }
}

/// Opaque, process-unique identifier of a cached image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheId(uuid::Uuid);

impl CacheId {
    fn fresh() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl FromStr for CacheId {
    type Err = PlotshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| PlotshotError::not_found(format!("no cached image with id '{s}'")))
    }
}

/// Bytes handed back by [`RenderCache::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedImage {
    /// Encoded image.
    pub bytes: Arc<[u8]>,
    /// MIME type of `bytes`.
    pub content_type: &'static str,
}

#[derive(Debug)]
struct CacheEntry {
    bytes: Arc<[u8]>,
    created_at: Instant,
    // Tie-breaker for entries created within the same clock tick.
    seq: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheId, CacheEntry>,
    next_seq: u64,
}

/// Bounded, TTL-swept store of rendered images.
///
/// Eviction is by creation order only: reads never refresh an entry. Expiry happens only in
/// [`RenderCache::sweep_expired`] (run periodically by [`RenderCache::spawn_sweeper`]), so an
/// entry can stay readable for up to one sweep interval past its TTL.
#[derive(Debug)]
pub struct RenderCache {
    opts: RenderCacheOpts,
    state: Mutex<CacheState>,
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new(RenderCacheOpts::default())
    }
}

impl RenderCache {
    /// Create an empty cache. `max_entries` of 0 is treated as 1.
    pub fn new(opts: RenderCacheOpts) -> Self {
        Self {
            opts: RenderCacheOpts {
                max_entries: opts.max_entries.max(1),
                ..opts
            },
            state: Mutex::new(CacheState::default()),
        }
    }

    /// Effective options.
    pub fn opts(&self) -> RenderCacheOpts {
        self.opts
    }

    /// Store `bytes` under a fresh identifier.
    ///
    /// At capacity, exactly one entry (the oldest) is evicted first.
    pub fn put(&self, bytes: impl Into<Arc<[u8]>>) -> CacheId {
        self.put_at(bytes.into(), Instant::now())
    }

    pub(crate) fn put_at(&self, bytes: Arc<[u8]>, now: Instant) -> CacheId {
        let mut st = self.lock();

        if st.entries.len() >= self.opts.max_entries
            && let Some(oldest) = oldest_id(&st.entries)
        {
            st.entries.remove(&oldest);
            tracing::debug!(id = %oldest, "evicted oldest cache entry");
        }

        let id = CacheId::fresh();
        let seq = st.next_seq;
        st.next_seq += 1;
        let len = bytes.len();
        st.entries.insert(
            id,
            CacheEntry {
                bytes,
                created_at: now,
                seq,
            },
        );
        tracing::debug!(%id, bytes = len, entries = st.entries.len(), "cached render");
        id
    }

    /// Look up an entry. No TTL check happens here.
    pub fn get(&self, id: &CacheId) -> Option<CachedImage> {
        self.lock().entries.get(id).map(|e| CachedImage {
            bytes: Arc::clone(&e.bytes),
            content_type: IMAGE_CONTENT_TYPE,
        })
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry older than the TTL. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    pub(crate) fn sweep_expired_at(&self, now: Instant) -> usize {
        let ttl = self.opts.ttl;
        let mut st = self.lock();
        let before = st.entries.len();
        st.entries
            .retain(|_, e| now.saturating_duration_since(e.created_at) <= ttl);
        let removed = before - st.entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = st.entries.len(), "swept expired renders");
        }
        removed
    }

    /// Start the periodic sweep on a background thread.
    ///
    /// The thread only holds a weak reference: it exits when the returned handle is dropped or
    /// when the last strong reference to the cache goes away.
    pub fn spawn_sweeper(self: &Arc<Self>) -> std::io::Result<SweeperHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let cache: Weak<Self> = Arc::downgrade(self);
        let interval = self.opts.sweep_interval;

        let join = std::thread::Builder::new()
            .name("plotshot-cache-sweep".to_string())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                    let Some(cache) = cache.upgrade() else {
                        break;
                    };
                    cache.sweep_expired();
                }
            })?;

        Ok(SweeperHandle {
            stop: Some(stop_tx),
            join: Some(join),
        })
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // State stays consistent across a panic in a holder: every mutation is a single
        // map operation.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn oldest_id(entries: &HashMap<CacheId, CacheEntry>) -> Option<CacheId> {
    entries
        .iter()
        .min_by_key(|(_, e)| (e.created_at, e.seq))
        .map(|(id, _)| *id)
}

/// Owns the background sweep thread; dropping it stops and joins the thread.
#[derive(Debug)]
pub struct SweeperHandle {
    stop: Option<mpsc::Sender<()>>,
    join: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
        if let Some(join) = self.join.take()
            && join.join().is_err()
        {
            tracing::warn!("cache sweeper thread panicked");
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/store.rs"]
mod tests;
