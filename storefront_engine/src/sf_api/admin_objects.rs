//! Back-office form payloads and their validation.
//!
//! Validation here is structural only: required fields are present and non-blank and prices parse. Anything deeper
//! (foreign keys, uniqueness) is left to the hosted service.
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_common::{helpers::non_blank, Price};

use crate::{
    db_types::{
        BannerUpdate,
        CategoryId,
        CategoryUpdate,
        NewBanner,
        NewCategory,
        NewProduct,
        NewProductImage,
        ProductId,
        ProductImageUpdate,
        ProductUpdate,
    },
    helpers::double_option,
    sf_api::errors::AdminApiError,
};

/// A price as the back-office form sends it: either a JSON number or text such as `"89,90"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Number(serde_json::Number),
    Text(String),
}

impl PriceInput {
    pub fn parse(&self) -> Result<Price, AdminApiError> {
        let text = match self {
            PriceInput::Number(n) => n.to_string(),
            PriceInput::Text(s) => s.clone(),
        };
        Price::from_str(&text).map_err(|e| AdminApiError::invalid(format!("price '{text}': {e}")))
    }
}

impl From<&str> for PriceInput {
    fn from(value: &str) -> Self {
        PriceInput::Text(value.to_string())
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AdminApiError> {
    non_blank(value).ok_or_else(|| AdminApiError::invalid(format!("{field} is required")))
}

fn present_non_blank(value: Option<String>, field: &str) -> Result<Option<String>, AdminApiError> {
    match value {
        None => Ok(None),
        Some(v) => required(Some(v), field).map(Some),
    }
}

fn nullable(value: Option<Option<String>>) -> Option<Option<String>> {
    value.map(non_blank)
}

//--------------------------------------        Product        ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<PriceInput>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

impl ProductInput {
    pub fn new<S: Into<String>, P: Into<PriceInput>>(name: S, price: P) -> Self {
        Self { name: Some(name.into()), price: Some(price.into()), ..Default::default() }
    }

    /// Checks the form and builds the row to insert. New products are active unless the form says otherwise.
    pub fn validate(self) -> Result<NewProduct, AdminApiError> {
        let name = required(self.name, "name")?;
        let price = self.price.ok_or_else(|| AdminApiError::invalid("price is required"))?.parse()?;
        let mut product = NewProduct::new(name, price)
            .active(self.is_active.unwrap_or(true))
            .featured(self.is_featured.unwrap_or(false))
            .with_display_order(self.display_order.unwrap_or(0));
        product.description = non_blank(self.description);
        product.category_id = non_blank(self.category_id).map(CategoryId::from);
        Ok(product)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub price: Option<PriceInput>,
    #[serde(default, deserialize_with = "double_option")]
    pub category_id: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub display_order: Option<i32>,
}

impl ProductPatch {
    /// Checks the patch and builds the update. A new name re-derives the slug; blank descriptions and categories
    /// clear the column.
    pub fn validate(self) -> Result<ProductUpdate, AdminApiError> {
        let mut update = ProductUpdate::default();
        if let Some(name) = present_non_blank(self.name, "name")? {
            update = update.with_name(name);
        }
        if let Some(price) = self.price {
            update = update.with_price(price.parse()?);
        }
        update.description = nullable(self.description);
        update.category_id = nullable(self.category_id).map(|c| c.map(CategoryId::from));
        update.is_active = self.is_active;
        update.is_featured = self.is_featured;
        update.display_order = self.display_order;
        if update.is_empty() {
            return Err(AdminApiError::invalid("nothing to update"));
        }
        Ok(update)
    }
}

//--------------------------------------       Category        ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub display_order: Option<i32>,
}

impl CategoryInput {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self { name: Some(name.into()), ..Default::default() }
    }

    pub fn validate(self) -> Result<NewCategory, AdminApiError> {
        let name = required(self.name, "name")?;
        let mut category = NewCategory::new(name).with_display_order(self.display_order.unwrap_or(0));
        category.description = non_blank(self.description);
        Ok(category)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub display_order: Option<i32>,
}

impl CategoryPatch {
    pub fn validate(self) -> Result<CategoryUpdate, AdminApiError> {
        let mut update = CategoryUpdate::default();
        if let Some(name) = present_non_blank(self.name, "name")? {
            update = update.with_name(name);
        }
        update.description = nullable(self.description);
        update.display_order = self.display_order;
        if update.is_empty() {
            return Err(AdminApiError::invalid("nothing to update"));
        }
        Ok(update)
    }
}

//--------------------------------------        Banner         ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerInput {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl BannerInput {
    pub fn new<S: Into<String>>(image_url: S) -> Self {
        Self { image_url: Some(image_url.into()), ..Default::default() }
    }

    /// A banner without an image is refused.
    pub fn validate(self) -> Result<NewBanner, AdminApiError> {
        let image_url = required(self.image_url, "image_url")?;
        let mut banner = NewBanner::new(image_url)
            .active(self.is_active.unwrap_or(true))
            .with_display_order(self.display_order.unwrap_or(0));
        banner.title = non_blank(self.title);
        banner.link = non_blank(self.link);
        Ok(banner)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BannerPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub link: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
}

impl BannerPatch {
    pub fn validate(self) -> Result<BannerUpdate, AdminApiError> {
        let update = BannerUpdate {
            title: nullable(self.title),
            image_url: present_non_blank(self.image_url, "image_url")?,
            link: nullable(self.link),
            is_active: self.is_active,
            display_order: self.display_order,
        };
        if update.is_empty() {
            return Err(AdminApiError::invalid("nothing to update"));
        }
        Ok(update)
    }
}

//--------------------------------------     ProductImage      ---------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductImageInput {
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

impl ProductImageInput {
    pub fn new<S: Into<String>>(image_url: S, display_order: i32) -> Self {
        Self { image_url: Some(image_url.into()), display_order: Some(display_order) }
    }

    pub fn validate(self, product_id: ProductId) -> Result<NewProductImage, AdminApiError> {
        let image_url = required(self.image_url, "image_url")?;
        Ok(NewProductImage { product_id, image_url, display_order: self.display_order.unwrap_or(0) })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductImagePatch {
    pub image_url: Option<String>,
    pub display_order: Option<i32>,
}

impl ProductImagePatch {
    pub fn validate(self) -> Result<ProductImageUpdate, AdminApiError> {
        let update = ProductImageUpdate {
            image_url: present_non_blank(self.image_url, "image_url")?,
            display_order: self.display_order,
        };
        if update.is_empty() {
            return Err(AdminApiError::invalid("nothing to update"));
        }
        Ok(update)
    }
}
