//! Catalog writes for the back-office.
//!
//! Each operation validates its input, makes exactly one call to the backend and, if that call succeeds, invalidates
//! the cached reads of every entity the write can affect before announcing the change. Invalid input never reaches the
//! backend, and a failed write leaves the cache untouched.
//!
//! | write                    | invalidates             |
//! |--------------------------|-------------------------|
//! | products, product images | products                |
//! | categories               | categories and products |
//! | banners                  | banners                 |
//! | image upload             | nothing                 |
//!
//! Category writes also drop product reads: product rows embed their category, and category-filtered listings depend
//! on slug resolution.
use std::fmt::Debug;

use bytes::Bytes;
use log::*;

use crate::{
    cache::CatalogCache,
    db_types::{Banner, BannerId, Category, CategoryId, Entity, Product, ProductId, ProductImage, ProductImageId},
    events::{CatalogChangedEvent, ChangeAction, EventProducers, ImageUploadedEvent},
    helpers::upload_key,
    sf_api::{
        admin_objects::{
            BannerInput,
            BannerPatch,
            CategoryInput,
            CategoryPatch,
            ProductImageInput,
            ProductImagePatch,
            ProductInput,
            ProductPatch,
        },
        errors::AdminApiError,
    },
    traits::{CatalogMutations, ObjectStorage},
};

pub struct AdminApi<B> {
    db: B,
    cache: CatalogCache,
    producers: EventProducers,
}

impl<B: Debug> Debug for AdminApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AdminApi ({:?})", self.db)
    }
}

impl<B> AdminApi<B>
where B: CatalogMutations + ObjectStorage
{
    pub fn new(db: B, cache: CatalogCache) -> Self {
        Self { db, cache, producers: EventProducers::default() }
    }

    pub fn with_producers(mut self, producers: EventProducers) -> Self {
        self.producers = producers;
        self
    }

    fn committed(&self, entity: Entity, action: ChangeAction, id: &str) {
        let affected: &[Entity] = match entity {
            Entity::Products => &[Entity::Products],
            Entity::Categories => &[Entity::Categories, Entity::Products],
            Entity::Banners => &[Entity::Banners],
        };
        let evicted = affected.iter().map(|e| self.cache.invalidate_entity(*e)).sum::<usize>();
        info!("🛠️ {entity} {id} {action:?}. {evicted} cached reads invalidated.");
        self.producers.catalog_changed(CatalogChangedEvent::new(entity, action, id));
    }

    pub async fn create_product(&self, input: ProductInput) -> Result<Product, AdminApiError> {
        let product = input.validate()?;
        let product = self.db.insert_product(product).await?;
        self.committed(Entity::Products, ChangeAction::Created, product.id.as_str());
        Ok(product)
    }

    pub async fn update_product(&self, id: &ProductId, patch: ProductPatch) -> Result<Product, AdminApiError> {
        let update = patch.validate()?;
        let product = self.db.update_product(id, update).await?;
        self.committed(Entity::Products, ChangeAction::Updated, id.as_str());
        Ok(product)
    }

    /// Deletes the product row. Its images are left for the backend to deal with.
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), AdminApiError> {
        self.db.delete_product(id).await?;
        self.committed(Entity::Products, ChangeAction::Deleted, id.as_str());
        Ok(())
    }

    pub async fn create_category(&self, input: CategoryInput) -> Result<Category, AdminApiError> {
        let category = input.validate()?;
        let category = self.db.insert_category(category).await?;
        self.committed(Entity::Categories, ChangeAction::Created, category.id.as_str());
        Ok(category)
    }

    pub async fn update_category(&self, id: &CategoryId, patch: CategoryPatch) -> Result<Category, AdminApiError> {
        let update = patch.validate()?;
        let category = self.db.update_category(id, update).await?;
        self.committed(Entity::Categories, ChangeAction::Updated, id.as_str());
        Ok(category)
    }

    /// Deletes the category. Products that pointed at it keep their `category_id`.
    pub async fn delete_category(&self, id: &CategoryId) -> Result<(), AdminApiError> {
        self.db.delete_category(id).await?;
        self.committed(Entity::Categories, ChangeAction::Deleted, id.as_str());
        Ok(())
    }

    pub async fn create_banner(&self, input: BannerInput) -> Result<Banner, AdminApiError> {
        let banner = input.validate()?;
        let banner = self.db.insert_banner(banner).await?;
        self.committed(Entity::Banners, ChangeAction::Created, banner.id.as_str());
        Ok(banner)
    }

    pub async fn update_banner(&self, id: &BannerId, patch: BannerPatch) -> Result<Banner, AdminApiError> {
        let update = patch.validate()?;
        let banner = self.db.update_banner(id, update).await?;
        self.committed(Entity::Banners, ChangeAction::Updated, id.as_str());
        Ok(banner)
    }

    pub async fn delete_banner(&self, id: &BannerId) -> Result<(), AdminApiError> {
        self.db.delete_banner(id).await?;
        self.committed(Entity::Banners, ChangeAction::Deleted, id.as_str());
        Ok(())
    }

    pub async fn add_product_image(
        &self,
        product_id: &ProductId,
        input: ProductImageInput,
    ) -> Result<ProductImage, AdminApiError> {
        let image = input.validate(product_id.clone())?;
        let image = self.db.insert_product_image(image).await?;
        self.committed(Entity::Products, ChangeAction::Created, image.id.as_str());
        Ok(image)
    }

    pub async fn update_product_image(
        &self,
        id: &ProductImageId,
        patch: ProductImagePatch,
    ) -> Result<ProductImage, AdminApiError> {
        let update = patch.validate()?;
        let image = self.db.update_product_image(id, update).await?;
        self.committed(Entity::Products, ChangeAction::Updated, id.as_str());
        Ok(image)
    }

    pub async fn remove_product_image(&self, id: &ProductImageId) -> Result<(), AdminApiError> {
        self.db.delete_product_image(id).await?;
        self.committed(Entity::Products, ChangeAction::Deleted, id.as_str());
        Ok(())
    }

    /// Stores an image in the object store and returns its public URL. Nothing is invalidated: the URL only becomes
    /// part of the catalog once a product, image or banner write refers to it.
    pub async fn upload_image(
        &self,
        folder: Option<&str>,
        file_name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, AdminApiError> {
        if data.is_empty() {
            return Err(AdminApiError::invalid("the uploaded file is empty"));
        }
        let key =
            upload_key(folder.unwrap_or_default(), file_name).map_err(|e| AdminApiError::invalid(e.to_string()))?;
        let public_url = self.db.upload_object(&key, data, content_type).await?;
        info!("🛠️ Uploaded image to {key}");
        self.producers.image_uploaded(ImageUploadedEvent { key, public_url: public_url.clone() });
        Ok(public_url)
    }
}
