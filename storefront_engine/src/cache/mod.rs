//! # Query cache
//!
//! Every catalog read goes through a [`QueryCache`], keyed by a [`Fingerprint`]: the entity being read plus the
//! normalised parameters of the read. Cached data stays fresh until a mutation invalidates it; there is no expiry.
//!
//! If a read misses, exactly one fetch is started and every concurrent caller for the same fingerprint waits on that
//! same fetch. A failed fetch is handed to all of its waiters and nothing is cached.
//!
//! Invalidation evicts matching entries and also detaches matching fetches that are still in flight. A detached fetch
//! still resolves for the callers already waiting on it, but its result is thrown away instead of being written back,
//! so data read before a write can never repopulate the cache after it.
//!
//! A cache may be given a capacity, in which case the least recently read entry makes room for a new one.
//!
//! [`CatalogCache`] groups the typed caches the storefront needs. Create one at startup and hand clones of it to the
//! APIs; clones share state.
mod catalog_cache;
mod fingerprint;
mod query_cache;

pub use catalog_cache::{CatalogCache, DEFAULT_CACHE_CAPACITY};
pub use fingerprint::{Fingerprint, FingerprintPrefix};
pub use query_cache::{CacheStats, QueryCache};
