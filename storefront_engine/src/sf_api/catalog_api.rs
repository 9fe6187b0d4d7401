//! Read access to the catalog.
//!
//! Every read goes through the shared [`CatalogCache`]. The fingerprints used here are the ones the
//! [`AdminApi`](crate::AdminApi) invalidates after a write.
use std::{fmt::Debug, sync::Arc};

use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    cache::{CatalogCache, Fingerprint},
    carousel::{Carousel, Slide},
    db_types::{Banner, Category, Entity, Product},
    sf_api::{
        errors::CatalogApiError,
        query_objects::{CatalogFilter, ProductQuery},
        resolver::resolve_product_query,
    },
    traits::{CatalogQueries, RemoteError},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub products: usize,
    pub categories: usize,
    pub banners: usize,
}

pub struct CatalogApi<B> {
    db: B,
    cache: CatalogCache,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogQueries + Clone + Send + Sync + 'static
{
    pub fn new(db: B, cache: CatalogCache) -> Self {
        Self { db, cache }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// The public product listing for `filter`.
    ///
    /// The category lookup and the product query run as one fetch, so concurrent callers with the same filter share
    /// both remote calls.
    pub async fn products(&self, filter: &CatalogFilter) -> Result<Arc<Vec<Product>>, CatalogApiError> {
        let fingerprint = filter.fingerprint();
        let db = self.db.clone();
        let filter = filter.clone();
        let fetch = async move {
            let query = resolve_product_query(&filter, &db).await?;
            if query.is_unsatisfiable() {
                return Ok(Arc::new(Vec::new()));
            }
            let products = db.fetch_products(&query).await?;
            debug!("🛒️ Fetched {} products for the catalog", products.len());
            Ok::<_, RemoteError>(Arc::new(products))
        };
        Ok(self.cache.product_lists.fetch(fingerprint, fetch).await?)
    }

    /// A single product by slug, or `None` if there is no such product.
    pub async fn product_by_slug(&self, slug: &str) -> Result<Option<Arc<Product>>, CatalogApiError> {
        let fingerprint = Fingerprint::new(Entity::Products).with_param("slug", slug);
        let db = self.db.clone();
        let slug = slug.to_string();
        let fetch = async move {
            let product = db.fetch_product_by_slug(&slug).await?;
            if product.is_none() {
                debug!("🛒️ No product with slug '{slug}'");
            }
            Ok::<_, RemoteError>(product.map(Arc::new))
        };
        Ok(self.cache.product_details.fetch(fingerprint, fetch).await?)
    }

    /// Every product, active or not, in back-office order.
    pub async fn admin_products(&self) -> Result<Arc<Vec<Product>>, CatalogApiError> {
        let fingerprint = Fingerprint::new(Entity::Products).with_param("scope", "admin");
        let db = self.db.clone();
        let fetch = async move {
            let products = db.fetch_products(&ProductQuery::admin_listing()).await?;
            Ok::<_, RemoteError>(Arc::new(products))
        };
        Ok(self.cache.product_lists.fetch(fingerprint, fetch).await?)
    }

    pub async fn categories(&self) -> Result<Arc<Vec<Category>>, CatalogApiError> {
        let fingerprint = Fingerprint::new(Entity::Categories).with_param("scope", "all");
        let db = self.db.clone();
        let fetch = async move { Ok::<_, RemoteError>(Arc::new(db.fetch_categories().await?)) };
        Ok(self.cache.categories.fetch(fingerprint, fetch).await?)
    }

    pub async fn banners(&self, active_only: bool) -> Result<Arc<Vec<Banner>>, CatalogApiError> {
        let fingerprint = Fingerprint::new(Entity::Banners).with_param("active_only", active_only);
        let db = self.db.clone();
        let fetch = async move { Ok::<_, RemoteError>(Arc::new(db.fetch_banners(active_only).await?)) };
        Ok(self.cache.banners.fetch(fingerprint, fetch).await?)
    }

    /// The hero carousel, built from the active banners. Shows `fallback` alone if there are none.
    pub async fn hero_carousel(&self, fallback: Slide) -> Result<Carousel, CatalogApiError> {
        let banners = self.banners(true).await?;
        let carousel = Carousel::from_banners(&banners, fallback);
        trace!("🎠️ Hero carousel has {} slides", carousel.len());
        Ok(carousel)
    }

    /// Collection sizes for the back-office dashboard.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, CatalogApiError> {
        let (products, categories, banners) =
            futures::try_join!(self.admin_products(), self.categories(), self.banners(false))?;
        Ok(DashboardStats { products: products.len(), categories: categories.len(), banners: banners.len() })
    }
}
