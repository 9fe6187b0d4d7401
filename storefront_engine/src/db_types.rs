use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_common::{slugify, Price};

use crate::helpers::double_option;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(ProductId);
string_id!(CategoryId);
string_id!(BannerId);
string_id!(ProductImageId);

//--------------------------------------        Entity         ---------------------------------------------------------
/// The entity collections the catalog reads from and writes to. Product images are owned by products, so they are
/// cached and invalidated as part of [`Entity::Products`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Products,
    Categories,
    Banners,
}

impl Entity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Categories => "categories",
            Self::Banners => "banners",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

//--------------------------------------       Category        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// The slice of a category that is embedded in product rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

impl From<&Category> for CategorySummary {
    fn from(c: &Category) -> Self {
        Self { id: c.id.clone(), name: c.name.clone(), slug: c.slug.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
}

impl NewCategory {
    /// Creates a new category. The slug is derived from `name`.
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self { name, slug, description: None, display_order: 0 }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }
}

/// Partial update of a category. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl CategoryUpdate {
    /// Renames the category and re-derives its slug.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        self.slug = Some(slugify(&name));
        self.name = Some(name);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = Some(display_order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.slug.is_none() && self.description.is_none() && self.display_order.is_none()
    }

    pub fn apply_to(&self, category: &mut Category) {
        if let Some(name) = &self.name {
            category.name = name.clone();
        }
        if let Some(slug) = &self.slug {
            category.slug = slug.clone();
        }
        if let Some(description) = &self.description {
            category.description = description.clone();
        }
        if let Some(display_order) = self.display_order {
            category.display_order = display_order;
        }
    }
}

//--------------------------------------     ProductImage      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub product_id: ProductId,
    pub image_url: String,
    #[serde(default)]
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProductImage {
    pub product_id: ProductId,
    pub image_url: String,
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImageUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl ProductImageUpdate {
    pub fn is_empty(&self) -> bool {
        self.image_url.is_none() && self.display_order.is_none()
    }

    pub fn apply_to(&self, image: &mut ProductImage) {
        if let Some(url) = &self.image_url {
            image.image_url = url.clone();
        }
        if let Some(order) = self.display_order {
            image.display_order = order;
        }
    }
}

//--------------------------------------        Product        ---------------------------------------------------------
/// A product row, with its category summary and images embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub category: Option<CategorySummary>,
    #[serde(default)]
    pub images: Vec<ProductImage>,
}

impl Product {
    /// The image with the lowest display order.
    pub fn primary_image(&self) -> Option<&ProductImage> {
        self.images.iter().min_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)))
    }

    /// Embedded relations come back from the service in no particular order.
    pub fn sort_images(&mut self) {
        self.images.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub price: Price,
    pub category_id: Option<CategoryId>,
    pub is_active: bool,
    pub is_featured: bool,
    pub display_order: i32,
}

impl NewProduct {
    /// Creates an active, non-featured product. The slug is derived from `name`.
    pub fn new<S: Into<String>>(name: S, price: Price) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            name,
            slug,
            description: None,
            price,
            category_id: None,
            is_active: true,
            is_featured: false,
            display_order: 0,
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn featured(mut self, is_featured: bool) -> Self {
        self.is_featured = is_featured;
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }
}

/// Partial update of a product. `None` leaves a field unchanged; `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub category_id: Option<Option<CategoryId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl ProductUpdate {
    /// Renames the product and re-derives its slug.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        let name = name.into();
        self.slug = Some(slugify(&name));
        self.name = Some(name);
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_category(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    pub fn with_featured(mut self, is_featured: bool) -> Self {
        self.is_featured = Some(is_featured);
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = Some(display_order);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() &&
            self.slug.is_none() &&
            self.description.is_none() &&
            self.price.is_none() &&
            self.category_id.is_none() &&
            self.is_active.is_none() &&
            self.is_featured.is_none() &&
            self.display_order.is_none()
    }

    /// Applies the changes to an in-memory row. Does not touch the embedded category or `updated_at`.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(slug) = &self.slug {
            product.slug = slug.clone();
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category_id) = &self.category_id {
            product.category_id = category_id.clone();
        }
        if let Some(is_active) = self.is_active {
            product.is_active = is_active;
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }
        if let Some(display_order) = self.display_order {
            product.display_order = display_order;
        }
    }
}

//--------------------------------------        Banner         ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub id: BannerId,
    #[serde(default)]
    pub title: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub link: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBanner {
    pub title: Option<String>,
    pub image_url: String,
    pub link: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
}

impl NewBanner {
    pub fn new<S: Into<String>>(image_url: S) -> Self {
        Self { title: None, image_url: image_url.into(), link: None, is_active: true, display_order: 0 }
    }

    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_link<S: Into<String>>(mut self, link: S) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    pub fn with_display_order(mut self, display_order: i32) -> Self {
        self.display_order = display_order;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BannerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl BannerUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() &&
            self.image_url.is_none() &&
            self.link.is_none() &&
            self.is_active.is_none() &&
            self.display_order.is_none()
    }

    pub fn apply_to(&self, banner: &mut Banner) {
        if let Some(title) = &self.title {
            banner.title = title.clone();
        }
        if let Some(url) = &self.image_url {
            banner.image_url = url.clone();
        }
        if let Some(link) = &self.link {
            banner.link = link.clone();
        }
        if let Some(is_active) = self.is_active {
            banner.is_active = is_active;
        }
        if let Some(display_order) = self.display_order {
            banner.display_order = display_order;
        }
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_rows_deserialize_with_embedded_relations() {
        let row = json!({
            "id": "p-1",
            "name": "Camisa Azul",
            "slug": "camisa-azul",
            "description": null,
            "price": 100,
            "category_id": "c-1",
            "is_active": true,
            "is_featured": false,
            "display_order": 2,
            "created_at": "2024-05-01T12:00:00+00:00",
            "updated_at": "2024-05-01T12:00:00+00:00",
            "category": { "id": "c-1", "name": "Camisas", "slug": "camisas" },
            "images": [
                { "id": "i-2", "product_id": "p-1", "image_url": "https://x/2.jpg", "display_order": 1 },
                { "id": "i-1", "product_id": "p-1", "image_url": "https://x/1.jpg", "display_order": 0 }
            ]
        });
        let mut product: Product = serde_json::from_value(row).unwrap();
        assert_eq!(product.price, Price::from(100));
        assert_eq!(product.category.as_ref().unwrap().slug, "camisas");
        assert_eq!(product.primary_image().unwrap().id.as_str(), "i-1");
        product.sort_images();
        assert_eq!(product.images[0].image_url, "https://x/1.jpg");
    }

    #[test]
    fn new_rows_derive_slugs() {
        let p = NewProduct::new("Calça Jeans Azul", Price::from(150));
        assert_eq!(p.slug, "calca-jeans-azul");
        assert!(p.is_active);
        assert_eq!(NewCategory::new("Acessórios").slug, "acessorios");
    }

    #[test]
    fn updates_skip_absent_fields() {
        let update = ProductUpdate::default().with_name("Vestido Floral").with_description(None);
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value, json!({ "name": "Vestido Floral", "slug": "vestido-floral", "description": null }));
        assert!(ProductUpdate::default().is_empty());
    }

    #[test]
    fn updates_distinguish_null_from_absent() {
        let update: BannerUpdate = serde_json::from_value(json!({ "link": null, "is_active": false })).unwrap();
        assert_eq!(update.link, Some(None));
        assert_eq!(update.title, None);
        assert_eq!(update.is_active, Some(false));
    }
}
