//! Backend over the hosted data service.
//!
//! Every trait method maps onto a single call of [`HostedStoreApi`]. Errors from the client are flattened into
//! [`RemoteError`].
mod auth;
mod products;

use std::fmt::Debug;

use bytes::Bytes;
use hosted_store::{Direction, HostedStoreApi, RowQuery};
use log::*;
use serde::Deserialize;

use crate::{
    db_types::{
        Banner,
        BannerId,
        BannerUpdate,
        Category,
        CategoryId,
        CategoryUpdate,
        NewBanner,
        NewCategory,
        NewProduct,
        NewProductImage,
        Product,
        ProductId,
        ProductImage,
        ProductImageId,
        ProductImageUpdate,
        ProductUpdate,
    },
    sf_api::{errors::AuthApiError, query_objects::ProductQuery},
    traits::{
        AdminIdentity,
        AdminSession,
        AuthManagement,
        CatalogMutations,
        CatalogQueries,
        CategoryLookup,
        ObjectStorage,
        RemoteError,
    },
};

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "categories";
const BANNERS: &str = "banners";
const PRODUCT_IMAGES: &str = "product_images";

#[derive(Clone)]
pub struct HostedCatalog {
    api: HostedStoreApi,
}

impl Debug for HostedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostedCatalog ({})", self.api.config().url)
    }
}

impl HostedCatalog {
    pub fn new(api: HostedStoreApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &HostedStoreApi {
        &self.api
    }
}

#[derive(Deserialize)]
struct IdRow {
    id: CategoryId,
}

impl CategoryLookup for HostedCatalog {
    async fn fetch_category_id_by_slug(&self, slug: &str) -> Result<Option<CategoryId>, RemoteError> {
        let query = RowQuery::new().select("id").eq("slug", slug);
        let row = self.api.select_one::<IdRow>(CATEGORIES, &query).await?;
        Ok(row.map(|r| r.id))
    }
}

impl CatalogQueries for HostedCatalog {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, RemoteError> {
        let rows = products::row_query(query);
        let mut products = self.api.select::<Product>(PRODUCTS, &rows).await?;
        products.iter_mut().for_each(Product::sort_images);
        trace!("🗃️ Fetched {} products", products.len());
        Ok(products)
    }

    async fn fetch_product_by_slug(&self, slug: &str) -> Result<Option<Product>, RemoteError> {
        let query = RowQuery::new().select(products::PRODUCT_COLUMNS).eq("slug", slug);
        let mut product = self.api.select_one::<Product>(PRODUCTS, &query).await?;
        if let Some(p) = product.as_mut() {
            p.sort_images();
        }
        Ok(product)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteError> {
        let query = RowQuery::new().order("display_order", Direction::Asc).order("id", Direction::Asc);
        Ok(self.api.select::<Category>(CATEGORIES, &query).await?)
    }

    async fn fetch_banners(&self, active_only: bool) -> Result<Vec<Banner>, RemoteError> {
        let mut query = RowQuery::new();
        if active_only {
            query = query.eq("is_active", true);
        }
        let query = query.order("display_order", Direction::Asc).order("id", Direction::Asc);
        Ok(self.api.select::<Banner>(BANNERS, &query).await?)
    }
}

impl CatalogMutations for HostedCatalog {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, RemoteError> {
        Ok(self.api.insert::<Product, _>(PRODUCTS, &product).await?)
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RemoteError> {
        Ok(self.api.update::<Product, _>(PRODUCTS, id.as_str(), &update).await?)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError> {
        Ok(self.api.delete(PRODUCTS, id.as_str()).await?)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, RemoteError> {
        Ok(self.api.insert::<Category, _>(CATEGORIES, &category).await?)
    }

    async fn update_category(&self, id: &CategoryId, update: CategoryUpdate) -> Result<Category, RemoteError> {
        Ok(self.api.update::<Category, _>(CATEGORIES, id.as_str(), &update).await?)
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), RemoteError> {
        Ok(self.api.delete(CATEGORIES, id.as_str()).await?)
    }

    async fn insert_banner(&self, banner: NewBanner) -> Result<Banner, RemoteError> {
        Ok(self.api.insert::<Banner, _>(BANNERS, &banner).await?)
    }

    async fn update_banner(&self, id: &BannerId, update: BannerUpdate) -> Result<Banner, RemoteError> {
        Ok(self.api.update::<Banner, _>(BANNERS, id.as_str(), &update).await?)
    }

    async fn delete_banner(&self, id: &BannerId) -> Result<(), RemoteError> {
        Ok(self.api.delete(BANNERS, id.as_str()).await?)
    }

    async fn insert_product_image(&self, image: NewProductImage) -> Result<ProductImage, RemoteError> {
        Ok(self.api.insert::<ProductImage, _>(PRODUCT_IMAGES, &image).await?)
    }

    async fn update_product_image(
        &self,
        id: &ProductImageId,
        update: ProductImageUpdate,
    ) -> Result<ProductImage, RemoteError> {
        Ok(self.api.update::<ProductImage, _>(PRODUCT_IMAGES, id.as_str(), &update).await?)
    }

    async fn delete_product_image(&self, id: &ProductImageId) -> Result<(), RemoteError> {
        Ok(self.api.delete(PRODUCT_IMAGES, id.as_str()).await?)
    }
}

impl ObjectStorage for HostedCatalog {
    async fn upload_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String, RemoteError> {
        Ok(self.api.upload(key, data, content_type).await?)
    }
}

impl AuthManagement for HostedCatalog {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthApiError> {
        let session = self.api.sign_in_with_password(email, password).await.map_err(auth::sign_in_error)?;
        Ok(auth::admin_session(session))
    }

    async fn verify_access_token(&self, token: &str) -> Result<AdminIdentity, AuthApiError> {
        let user = self.api.fetch_user(token).await.map_err(auth::verification_error)?;
        Ok(AdminIdentity { user_id: user.id, email: user.email })
    }
}
