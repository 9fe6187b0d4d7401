use std::{
    collections::HashMap,
    future::Future,
    num::NonZeroUsize,
    ops::Add,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::*;
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

use crate::{
    cache::{Fingerprint, FingerprintPrefix},
    traits::RemoteError,
};

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, RemoteError>>>;

struct InFlight<V> {
    ticket: u64,
    fetch: SharedFetch<V>,
}

struct CacheState<V> {
    entries: LruCache<Fingerprint, V>,
    in_flight: HashMap<Fingerprint, InFlight<V>>,
    next_ticket: u64,
}

impl<V> CacheState<V> {
    fn new(entries: LruCache<Fingerprint, V>) -> Self {
        Self { entries, in_flight: HashMap::new(), next_ticket: 0 }
    }
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    joins: AtomicU64,
    fetches: AtomicU64,
}

/// A snapshot of cache activity.
///
/// `hits` were served from the cache, `joins` waited on a fetch that another caller had already started, and
/// `fetches` started a new remote call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub joins: u64,
    pub fetches: u64,
}

impl CacheStats {
    pub fn misses(&self) -> u64 {
        self.joins + self.fetches
    }
}

impl Add for CacheStats {
    type Output = CacheStats;

    fn add(self, rhs: Self) -> Self::Output {
        CacheStats { hits: self.hits + rhs.hits, joins: self.joins + rhs.joins, fetches: self.fetches + rhs.fetches }
    }
}

enum Lookup<V> {
    Hit(V),
    Pending(SharedFetch<V>),
}

/// A de-duplicating read cache for values of type `V`.
///
/// Cloning the cache hands out another handle to the same state. One mutex guards both the stored entries and the
/// registry of in-flight fetches, and it is never held across an await point.
///
/// A cache built with [`QueryCache::with_capacity`] keeps at most that many entries and drops the least recently read
/// one to make room. Eviction only costs a re-fetch; entries are still fresh until invalidated.
pub struct QueryCache<V> {
    name: &'static str,
    state: Arc<Mutex<CacheState<V>>>,
    counters: Arc<Counters>,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        Self { name: self.name, state: Arc::clone(&self.state), counters: Arc::clone(&self.counters) }
    }
}

impl<V> QueryCache<V>
where V: Clone + Send + Sync + 'static
{
    pub fn new(name: &'static str) -> Self {
        Self::from_entries(name, LruCache::unbounded())
    }

    pub fn with_capacity(name: &'static str, capacity: NonZeroUsize) -> Self {
        Self::from_entries(name, LruCache::new(capacity))
    }

    fn from_entries(name: &'static str, entries: LruCache<Fingerprint, V>) -> Self {
        Self { name, state: Arc::new(Mutex::new(CacheState::new(entries))), counters: Arc::new(Counters::default()) }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the cached value for `fingerprint` without fetching anything or marking it as recently used.
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<V> {
        self.state.lock().entries.peek(fingerprint).cloned()
    }

    pub fn contains(&self, fingerprint: &Fingerprint) -> bool {
        self.state.lock().entries.contains(fingerprint)
    }

    pub fn capacity(&self) -> Option<usize> {
        let cap = self.state.lock().entries.cap().get();
        (cap < usize::MAX).then_some(cap)
    }

    /// Number of cached entries. Fetches still in flight are not counted.
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            joins: self.counters.joins.load(Ordering::Relaxed),
            fetches: self.counters.fetches.load(Ordering::Relaxed),
        }
    }

    /// Returns the value for `fingerprint`, running `fetch` only if the value is neither cached nor already being
    /// fetched.
    ///
    /// `fetch` is only polled when this call starts a new fetch; otherwise it is dropped unpolled. The fetch runs to
    /// completion as long as any caller is still waiting on it, even if the caller that started it goes away.
    pub async fn fetch<F>(&self, fingerprint: Fingerprint, fetch: F) -> Result<V, RemoteError>
    where F: Future<Output = Result<V, RemoteError>> + Send + 'static {
        match self.lookup_or_start(fingerprint, fetch) {
            Lookup::Hit(value) => Ok(value),
            Lookup::Pending(pending) => pending.await,
        }
    }

    fn lookup_or_start<F>(&self, fingerprint: Fingerprint, fetch: F) -> Lookup<V>
    where F: Future<Output = Result<V, RemoteError>> + Send + 'static {
        let mut state = self.state.lock();
        if let Some(value) = state.entries.get(&fingerprint) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            trace!("🧊️ [{}] Cache hit for {fingerprint}", self.name);
            return Lookup::Hit(value.clone());
        }
        if let Some(in_flight) = state.in_flight.get(&fingerprint) {
            self.counters.joins.fetch_add(1, Ordering::Relaxed);
            trace!("🧊️ [{}] Joining fetch #{} for {fingerprint}", self.name, in_flight.ticket);
            return Lookup::Pending(in_flight.fetch.clone());
        }
        self.counters.fetches.fetch_add(1, Ordering::Relaxed);
        let ticket = state.next_ticket;
        state.next_ticket += 1;
        debug!("🧊️ [{}] Cache miss for {fingerprint}. Starting fetch #{ticket}", self.name);
        let name = self.name;
        let registry = Arc::downgrade(&self.state);
        let key = fingerprint.clone();
        let shared = async move {
            let result = fetch.await;
            if let Some(state) = registry.upgrade() {
                complete(name, &state, &key, ticket, &result);
            }
            result
        }
        .boxed()
        .shared();
        state.in_flight.insert(fingerprint, InFlight { ticket, fetch: shared.clone() });
        Lookup::Pending(shared)
    }

    /// Evicts every entry matching `prefix` and detaches matching fetches that are still in flight. Returns how many
    /// entries and fetches were affected.
    pub fn invalidate(&self, prefix: &FingerprintPrefix) -> usize {
        let mut state = self.state.lock();
        let stale =
            state.entries.iter().filter(|(fp, _)| fp.matches(prefix)).map(|(fp, _)| fp.clone()).collect::<Vec<_>>();
        for fp in &stale {
            state.entries.pop(fp);
        }
        let evicted = stale.len();
        let in_flight_before = state.in_flight.len();
        state.in_flight.retain(|fp, _| !fp.matches(prefix));
        let detached = in_flight_before - state.in_flight.len();
        if evicted + detached > 0 {
            debug!("🧊️ [{}] Invalidated {evicted} entries and detached {detached} in-flight fetches", self.name);
        }
        evicted + detached
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.entries.clear();
        state.in_flight.clear();
        debug!("🧊️ [{}] Cache cleared", self.name);
    }
}

/// Records the outcome of fetch `ticket`. Only a fetch that is still registered for its fingerprint may write; a
/// detached fetch leaves the cache alone.
fn complete<V: Clone>(
    name: &str,
    state: &Mutex<CacheState<V>>,
    fingerprint: &Fingerprint,
    ticket: u64,
    result: &Result<V, RemoteError>,
) {
    let mut state = state.lock();
    let registered = state.in_flight.get(fingerprint).is_some_and(|f| f.ticket == ticket);
    if !registered {
        debug!("🧊️ [{name}] Fetch #{ticket} for {fingerprint} was invalidated while in flight. Discarding its result.");
        return;
    }
    state.in_flight.remove(fingerprint);
    match result {
        Ok(value) => {
            match state.entries.push(fingerprint.clone(), value.clone()) {
                Some((dropped, _)) if &dropped != fingerprint => {
                    debug!("🧊️ [{name}] Cache is full. Dropped the least recently used entry, {dropped}");
                },
                _ => {},
            }
            trace!("🧊️ [{name}] Cached result of fetch #{ticket} for {fingerprint}");
        },
        Err(e) => warn!("🧊️ [{name}] Fetch #{ticket} for {fingerprint} failed. Nothing was cached. {e}"),
    }
}

#[cfg(test)]
mod test {
    use std::{sync::atomic::AtomicUsize, time::Duration};

    use tokio::sync::oneshot;

    use super::*;
    use crate::db_types::Entity;

    fn fp(slug: &str) -> Fingerprint {
        Fingerprint::new(Entity::Products).with_param("slug", slug)
    }

    #[tokio::test]
    async fn second_read_is_a_hit() {
        let cache = QueryCache::<u32>::new("test");
        let v = cache.fetch(fp("a"), async { Ok(7) }).await.unwrap();
        assert_eq!(v, 7);
        let v = cache.fetch(fp("a"), async { Ok(99) }).await.unwrap();
        assert_eq!(v, 7);
        assert_eq!(cache.stats(), CacheStats { hits: 1, joins: 0, fetches: 1 });
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_fetch() {
        let cache = QueryCache::<u32>::new("test");
        let calls = Arc::new(AtomicUsize::new(0));
        let reads = (0..10).map(|_| {
            let calls = Arc::clone(&calls);
            cache.fetch(fp("a"), async move {
                calls.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok(42)
            })
        });
        let results = futures::future::join_all(reads).await;
        assert!(results.iter().all(|r| r == &Ok(42)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().fetches, 1);
        assert_eq!(cache.stats().joins, 9);
    }

    #[tokio::test]
    async fn failures_reach_every_waiter_and_are_not_cached() {
        let cache = QueryCache::<u32>::new("test");
        let (tx, rx) = oneshot::channel::<()>();
        let first = cache.fetch(fp("a"), async move {
            let _ = rx.await;
            Err(RemoteError::new("boom"))
        });
        let second = cache.fetch(fp("a"), async { Ok(1) });
        let release = async move {
            tokio::task::yield_now().await;
            let _ = tx.send(());
        };
        let (a, b, _) = tokio::join!(first, second, release);
        assert_eq!(a, Err(RemoteError::new("boom")));
        assert_eq!(b, Err(RemoteError::new("boom")));
        assert!(cache.is_empty());
        let c = cache.fetch(fp("a"), async { Ok(3) }).await;
        assert_eq!(c, Ok(3));
        assert_eq!(cache.stats().fetches, 2);
    }

    #[tokio::test]
    async fn invalidation_detaches_in_flight_fetches() {
        let cache = QueryCache::<u32>::new("test");
        let (tx, rx) = oneshot::channel::<u32>();
        let stale = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.fetch(fp("a"), async move { Ok(rx.await.unwrap_or(0)) }).await })
        };
        // let the spawned read register its fetch
        while cache.stats().fetches == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(cache.invalidate(&Entity::Products.into()), 1);
        let _ = tx.send(1);
        assert_eq!(stale.await.unwrap(), Ok(1));
        assert!(!cache.contains(&fp("a")));
        let fresh = cache.fetch(fp("a"), async { Ok(2) }).await;
        assert_eq!(fresh, Ok(2));
        assert_eq!(cache.get(&fp("a")), Some(2));
    }

    #[tokio::test]
    async fn full_cache_drops_the_least_recently_read_entry() {
        let cache = QueryCache::<u32>::with_capacity("test", NonZeroUsize::new(2).unwrap());
        assert_eq!(cache.capacity(), Some(2));
        cache.fetch(fp("a"), async { Ok(1) }).await.unwrap();
        cache.fetch(fp("b"), async { Ok(2) }).await.unwrap();
        // reading "a" again makes "b" the oldest
        cache.fetch(fp("a"), async { Ok(10) }).await.unwrap();
        cache.fetch(fp("c"), async { Ok(3) }).await.unwrap();
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&fp("a")));
        assert!(!cache.contains(&fp("b")));
        assert!(cache.contains(&fp("c")));
        let b = cache.fetch(fp("b"), async { Ok(20) }).await;
        assert_eq!(b, Ok(20));
        assert_eq!(cache.stats(), CacheStats { hits: 1, joins: 0, fetches: 4 });
    }

    #[tokio::test]
    async fn bounded_cache_stays_bounded() {
        let cache = QueryCache::<u32>::with_capacity("test", NonZeroUsize::new(64).unwrap());
        for i in 0..1000u32 {
            cache.fetch(fp(&format!("q{i}")), async move { Ok(i) }).await.unwrap();
        }
        assert_eq!(cache.len(), 64);
        assert_eq!(cache.get(&fp("q999")), Some(999));
        assert_eq!(QueryCache::<u32>::new("test").capacity(), None);
    }

    #[tokio::test]
    async fn invalidation_is_scoped_by_prefix() {
        let cache = QueryCache::<u32>::new("test");
        cache.fetch(fp("a"), async { Ok(1) }).await.unwrap();
        cache.fetch(fp("b"), async { Ok(2) }).await.unwrap();
        let evicted = cache.invalidate(&FingerprintPrefix::new(Entity::Products).with_param("slug", "a"));
        assert_eq!(evicted, 1);
        assert!(!cache.contains(&fp("a")));
        assert!(cache.contains(&fp("b")));
        assert_eq!(cache.invalidate(&Entity::Banners.into()), 0);
        assert_eq!(cache.len(), 1);
    }
}
