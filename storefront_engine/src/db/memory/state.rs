use std::{cmp::Ordering, collections::HashMap};

use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};

use crate::{
    db_types::{Banner, Category, CategorySummary, Product, ProductImage},
    sf_api::query_objects::{ProductColumn, ProductOrdering, ProductPredicate, ProductQuery},
    traits::AdminIdentity,
};

pub struct MemoryUser {
    pub id: String,
    pub email: String,
    pub password: String,
}

pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// Rows as the hosted service would store them. Products are kept without their embedded relations; those are
/// joined in when the product is read.
#[derive(Default)]
pub struct MemoryState {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub banners: Vec<Banner>,
    pub images: Vec<ProductImage>,
    pub users: Vec<MemoryUser>,
    pub tokens: HashMap<String, AdminIdentity>,
    pub objects: HashMap<String, StoredObject>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl MemoryState {
    /// The current time, nudged forward if needed so that every row gets a distinct timestamp.
    pub fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::milliseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }

    /// A product with its category summary and sorted images joined in.
    pub fn joined(&self, product: &Product) -> Product {
        let mut product = product.clone();
        product.category = product
            .category_id
            .as_ref()
            .and_then(|id| self.categories.iter().find(|c| &c.id == id))
            .map(CategorySummary::from);
        product.images = self.images.iter().filter(|i| i.product_id == product.id).cloned().collect();
        product.sort_images();
        product
    }

    pub fn select_products(&self, query: &ProductQuery) -> Vec<Product> {
        let mut rows = self.products.iter().filter(|p| matches(query, p)).collect::<Vec<_>>();
        rows.sort_by(|a, b| compare(&query.ordering, a, b));
        rows.into_iter().map(|p| self.joined(p)).collect()
    }
}

fn matches(query: &ProductQuery, product: &Product) -> bool {
    query.predicates.iter().all(|predicate| match predicate {
        ProductPredicate::CategoryIs(id) => product.category_id.as_ref() == Some(id),
        ProductPredicate::NameContains(needle) => product.name.to_lowercase().contains(&needle.to_lowercase()),
        ProductPredicate::FeaturedOnly => product.is_featured,
        ProductPredicate::Unsatisfiable => false,
    })
}

fn compare(ordering: &[ProductOrdering], a: &Product, b: &Product) -> Ordering {
    ordering
        .iter()
        .map(|o| {
            let ord = match o.column {
                ProductColumn::Price => a.price.value().cmp(&b.price.value()),
                ProductColumn::IsFeatured => a.is_featured.cmp(&b.is_featured),
                ProductColumn::DisplayOrder => a.display_order.cmp(&b.display_order),
                ProductColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                ProductColumn::Id => a.id.as_str().cmp(b.id.as_str()),
            };
            if o.ascending {
                ord
            } else {
                ord.reverse()
            }
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
