use std::{num::NonZeroUsize, sync::Arc};

use log::*;

use crate::{
    cache::{CacheStats, FingerprintPrefix, QueryCache},
    db_types::{Banner, Category, Entity, Product},
};

/// Default number of product listings, and of product details, kept in a [`CatalogCache`].
pub const DEFAULT_CACHE_CAPACITY: usize = 256;

/// The caches behind the catalog reads, one per result shape.
///
/// Product listings and details are keyed by shopper input (search text, slugs), so those two caches are bounded.
/// Categories and banners have one entry per view and are not.
///
/// Create one `CatalogCache` when the application starts and pass clones of it to [`CatalogApi`](crate::CatalogApi)
/// and [`AdminApi`](crate::AdminApi). Tests create their own.
#[derive(Clone)]
pub struct CatalogCache {
    pub(crate) product_lists: QueryCache<Arc<Vec<Product>>>,
    pub(crate) product_details: QueryCache<Option<Arc<Product>>>,
    pub(crate) categories: QueryCache<Arc<Vec<Category>>>,
    pub(crate) banners: QueryCache<Arc<Vec<Banner>>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// A cache that keeps at most `capacity` product listings and `capacity` product details. A zero capacity is
    /// treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            product_lists: QueryCache::with_capacity("product_lists", capacity),
            product_details: QueryCache::with_capacity("product_details", capacity),
            categories: QueryCache::new("categories"),
            banners: QueryCache::new("banners"),
        }
    }

    /// Invalidates everything under `prefix` across all caches. Returns the number of evicted entries plus detached
    /// fetches.
    pub fn invalidate(&self, prefix: &FingerprintPrefix) -> usize {
        let count = self.product_lists.invalidate(prefix) +
            self.product_details.invalidate(prefix) +
            self.categories.invalidate(prefix) +
            self.banners.invalidate(prefix);
        debug!("🧊️ Invalidated {count} cached reads under {:?}", prefix.entity());
        count
    }

    pub fn invalidate_entity(&self, entity: Entity) -> usize {
        self.invalidate(&FingerprintPrefix::new(entity))
    }

    pub fn clear(&self) {
        self.product_lists.clear();
        self.product_details.clear();
        self.categories.clear();
        self.banners.clear();
    }

    /// Total number of cached entries.
    pub fn len(&self) -> usize {
        self.product_lists.len() + self.product_details.len() + self.categories.len() + self.banners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.product_lists.stats() + self.product_details.stats() + self.categories.stats() + self.banners.stats()
    }
}
