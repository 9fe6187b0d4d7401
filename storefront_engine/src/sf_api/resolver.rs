//! Turns a [`CatalogFilter`] into a [`ProductQuery`].
//!
//! Resolution is split in two. [`build_product_query`] is a pure function of the filter and the outcome of the
//! category lookup. [`resolve_product_query`] performs that lookup through a [`CategoryLookup`] and then calls it.
use log::*;

use crate::{
    db_types::CategoryId,
    sf_api::query_objects::{CatalogFilter, ProductColumn, ProductOrdering, ProductPredicate, ProductQuery, SortMode},
    traits::{CategoryLookup, RemoteError},
};

/// The outcome of looking up the category slug of a filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryResolution {
    /// The filter names no category.
    NotRequested,
    Found(CategoryId),
    /// The filter names a category that does not exist.
    Missing,
}

/// Column orderings for a sort mode. The list always ends with `id asc`.
pub fn sort_ordering(mode: SortMode) -> Vec<ProductOrdering> {
    use ProductColumn::*;
    let mut ordering = match mode {
        SortMode::PriceAsc => vec![ProductOrdering::asc(Price)],
        SortMode::PriceDesc => vec![ProductOrdering::desc(Price)],
        SortMode::Featured => vec![ProductOrdering::desc(IsFeatured), ProductOrdering::asc(DisplayOrder)],
        SortMode::Recent => vec![ProductOrdering::desc(CreatedAt)],
    };
    ordering.push(ProductOrdering::asc(Id));
    ordering
}

pub fn build_product_query(filter: &CatalogFilter, category: CategoryResolution) -> ProductQuery {
    let mut predicates = Vec::new();
    match category {
        CategoryResolution::NotRequested => {},
        CategoryResolution::Found(id) => predicates.push(ProductPredicate::CategoryIs(id)),
        CategoryResolution::Missing => predicates.push(ProductPredicate::Unsatisfiable),
    }
    if let Some(search) = &filter.search {
        predicates.push(ProductPredicate::NameContains(search.clone()));
    }
    if filter.featured {
        predicates.push(ProductPredicate::FeaturedOnly);
    }
    ProductQuery { predicates, ordering: sort_ordering(filter.sort) }
}

/// Looks up the filter's category (if any) and builds the product query.
///
/// An unknown category slug yields a query that matches nothing, never an unfiltered one.
pub async fn resolve_product_query<L: CategoryLookup>(
    filter: &CatalogFilter,
    lookup: &L,
) -> Result<ProductQuery, RemoteError> {
    let category = match &filter.category_slug {
        None => CategoryResolution::NotRequested,
        Some(slug) => match lookup.fetch_category_id_by_slug(slug).await? {
            Some(id) => CategoryResolution::Found(id),
            None => {
                debug!("🛒 No category with slug '{slug}'. The listing will be empty.");
                CategoryResolution::Missing
            },
        },
    };
    Ok(build_product_query(filter, category))
}
