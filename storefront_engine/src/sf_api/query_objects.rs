use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use storefront_common::helpers::non_blank;

use crate::{
    cache::Fingerprint,
    db_types::{CategoryId, Entity},
};

/// Sort order for the public catalog. Exactly one mode applies at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    #[default]
    Recent,
    Featured,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::Recent => "recent",
            SortMode::Featured => "featured",
            SortMode::PriceAsc => "price_asc",
            SortMode::PriceDesc => "price_desc",
        }
    }

    /// Reads a sort mode from a URL value. Anything unrecognised means [`SortMode::Recent`].
    pub fn from_param(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recent" => Ok(SortMode::Recent),
            "featured" => Ok(SortMode::Featured),
            "price_asc" => Ok(SortMode::PriceAsc),
            "price_desc" => Ok(SortMode::PriceDesc),
            other => Err(format!("Unknown sort mode: {other}")),
        }
    }
}

/// What the shopper asked for on the catalog page.
///
/// Build it with the `with_*` methods or [`CatalogFilter::new`]; both normalise blank strings to `None` so that
/// `?busca=` and no `busca` at all describe the same listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogFilter {
    pub category_slug: Option<String>,
    pub search: Option<String>,
    pub sort: SortMode,
    pub featured: bool,
}

impl CatalogFilter {
    pub fn new(category_slug: Option<String>, search: Option<String>, sort: Option<String>, featured: bool) -> Self {
        let sort = non_blank(sort).map(|s| SortMode::from_param(&s)).unwrap_or_default();
        Self { category_slug: non_blank(category_slug), search: search_term(search), sort, featured }
    }

    pub fn with_category<S: Into<String>>(mut self, slug: S) -> Self {
        self.category_slug = non_blank(Some(slug.into()));
        self
    }

    pub fn with_search<S: Into<String>>(mut self, search: S) -> Self {
        self.search = search_term(Some(search.into()));
        self
    }

    pub fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn featured_only(mut self) -> Self {
        self.featured = true;
        self
    }

    /// The cache key for the listing this filter describes.
    pub fn fingerprint(&self) -> Fingerprint {
        let mut fp = Fingerprint::new(Entity::Products).with_param("view", "catalog").with_param("sort", self.sort);
        if let Some(slug) = &self.category_slug {
            fp = fp.with_param("category", slug);
        }
        if let Some(search) = &self.search {
            fp = fp.with_param("search", search.to_lowercase());
        }
        if self.featured {
            fp = fp.with_param("featured", true);
        }
        fp
    }
}

/// The remote service reads `*` as a wildcard, so it is dropped from search text. A term left blank means no search.
fn search_term(search: Option<String>) -> Option<String> {
    non_blank(search.map(|s| s.replace('*', "")))
}

/// A restriction on which products a [`ProductQuery`] returns. All predicates in a query must hold.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductPredicate {
    CategoryIs(CategoryId),
    /// Case-insensitive substring match on the product name.
    NameContains(String),
    FeaturedOnly,
    /// Matches nothing. Used when a requested category does not exist.
    Unsatisfiable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductColumn {
    Price,
    IsFeatured,
    DisplayOrder,
    CreatedAt,
    Id,
}

impl ProductColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductColumn::Price => "price",
            ProductColumn::IsFeatured => "is_featured",
            ProductColumn::DisplayOrder => "display_order",
            ProductColumn::CreatedAt => "created_at",
            ProductColumn::Id => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProductOrdering {
    pub column: ProductColumn,
    pub ascending: bool,
}

impl ProductOrdering {
    pub fn asc(column: ProductColumn) -> Self {
        Self { column, ascending: true }
    }

    pub fn desc(column: ProductColumn) -> Self {
        Self { column, ascending: false }
    }
}

/// A backend-neutral description of a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductQuery {
    pub predicates: Vec<ProductPredicate>,
    pub ordering: Vec<ProductOrdering>,
}

impl ProductQuery {
    /// Every product, in back-office order.
    pub fn admin_listing() -> Self {
        Self {
            predicates: vec![],
            ordering: vec![ProductOrdering::asc(ProductColumn::DisplayOrder), ProductOrdering::asc(ProductColumn::Id)],
        }
    }

    pub fn is_unsatisfiable(&self) -> bool {
        self.predicates.contains(&ProductPredicate::Unsatisfiable)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sort_mode_params() {
        assert_eq!(SortMode::from_param("price_asc"), SortMode::PriceAsc);
        assert_eq!(SortMode::from_param("PRICE_DESC"), SortMode::PriceDesc);
        assert_eq!(SortMode::from_param("featured"), SortMode::Featured);
        assert_eq!(SortMode::from_param("cheapest"), SortMode::Recent);
        assert_eq!(SortMode::from_param(""), SortMode::Recent);
    }

    #[test]
    fn blank_values_are_absent() {
        let filter = CatalogFilter::new(Some("  ".into()), Some("".into()), Some(" ".into()), false);
        assert_eq!(filter, CatalogFilter::default());
        let filter = CatalogFilter::default().with_search("   ").with_category("");
        assert_eq!(filter, CatalogFilter::default());
    }

    #[test]
    fn wildcards_are_dropped_from_search() {
        let filter = CatalogFilter::new(None, Some("*".into()), None, false);
        assert_eq!(filter.search, None);
        let filter = CatalogFilter::default().with_search("cami*sa");
        assert_eq!(filter.search.as_deref(), Some("camisa"));
    }

    #[test]
    fn search_case_does_not_change_the_fingerprint() {
        let upper = CatalogFilter::default().with_search("AZUL");
        let lower = CatalogFilter::default().with_search("azul");
        assert_eq!(upper.fingerprint(), lower.fingerprint());
        assert_ne!(lower.fingerprint(), CatalogFilter::default().with_search("azuis").fingerprint());
    }

    #[test]
    fn fingerprints_ignore_missing_sort() {
        let a = CatalogFilter::new(Some("camisas".into()), None, None, false);
        let b = CatalogFilter::new(Some("camisas".into()), None, Some("recent".into()), false);
        assert_eq!(a.fingerprint(), b.fingerprint());
        let c = CatalogFilter::new(Some("camisas".into()), None, Some("price_asc".into()), false);
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn fingerprints_distinguish_filters() {
        let plain = CatalogFilter::default().fingerprint();
        let featured = CatalogFilter::default().featured_only().fingerprint();
        let search = CatalogFilter::default().with_search("azul").fingerprint();
        assert_ne!(plain, featured);
        assert_ne!(plain, search);
        assert_eq!(plain.entity(), Entity::Products);
    }
}
