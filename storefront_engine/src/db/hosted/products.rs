use hosted_store::{Direction, RowQuery};

use crate::sf_api::query_objects::{ProductPredicate, ProductQuery};

/// Product columns plus the embedded category summary and images.
pub const PRODUCT_COLUMNS: &str = "*, category:categories(id, name, slug), images:product_images(*)";

/// Translates a [`ProductQuery`] into row API filters.
pub fn row_query(query: &ProductQuery) -> RowQuery {
    let mut rows = RowQuery::new().select(PRODUCT_COLUMNS);
    for predicate in &query.predicates {
        rows = match predicate {
            ProductPredicate::CategoryIs(id) => rows.eq("category_id", id),
            ProductPredicate::NameContains(needle) => rows.ilike_contains("name", needle),
            ProductPredicate::FeaturedOnly => rows.eq("is_featured", true),
            // no row has a null primary key
            ProductPredicate::Unsatisfiable => rows.is_null("id"),
        };
    }
    for ordering in &query.ordering {
        let direction = if ordering.ascending { Direction::Asc } else { Direction::Desc };
        rows = rows.order(ordering.column.as_str(), direction);
    }
    rows
}
