use std::future::Future;

use crate::{
    db_types::{Banner, Category, CategoryId, Product},
    sf_api::query_objects::ProductQuery,
    traits::RemoteError,
};

/// Point lookup of a category by slug.
pub trait CategoryLookup {
    /// Returns the id of the category with the given slug, or `None` if no category matches.
    fn fetch_category_id_by_slug(
        &self,
        slug: &str,
    ) -> impl Future<Output = Result<Option<CategoryId>, RemoteError>> + Send;
}

/// Read access to the catalog. Every method is a single round trip to the backend.
pub trait CatalogQueries: CategoryLookup {
    /// Fetches the products matching `query`, in the order it specifies. Each product carries its category summary
    /// and its images sorted by display order.
    fn fetch_products(&self, query: &ProductQuery) -> impl Future<Output = Result<Vec<Product>, RemoteError>> + Send;

    /// Fetches a single product by slug. If several products share a slug, which one is returned is up to the backend.
    fn fetch_product_by_slug(&self, slug: &str) -> impl Future<Output = Result<Option<Product>, RemoteError>> + Send;

    /// All categories, ordered by display order.
    fn fetch_categories(&self) -> impl Future<Output = Result<Vec<Category>, RemoteError>> + Send;

    /// Banners ordered by display order. When `active_only` is set, inactive banners are left out.
    fn fetch_banners(&self, active_only: bool) -> impl Future<Output = Result<Vec<Banner>, RemoteError>> + Send;
}
