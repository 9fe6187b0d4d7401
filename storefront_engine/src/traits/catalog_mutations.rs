use std::future::Future;

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
    traits::RemoteError,
};

/// Write access to the catalog.
///
/// Each method maps to exactly one remote call; there are no multi-step transactions. Inserts and updates return the
/// row as stored. Updates of a row that does not exist fail. Deletes do not cascade: deleting a product leaves its
/// images behind, and deleting a category leaves `category_id` on its products untouched. Whatever the backend does
/// beyond that is its own business.
pub trait CatalogMutations {
    fn insert_product(&self, product: NewProduct) -> impl Future<Output = Result<Product, RemoteError>> + Send;

    fn update_product(
        &self,
        id: &ProductId,
        update: ProductUpdate,
    ) -> impl Future<Output = Result<Product, RemoteError>> + Send;

    fn delete_product(&self, id: &ProductId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn insert_category(&self, category: NewCategory) -> impl Future<Output = Result<Category, RemoteError>> + Send;

    fn update_category(
        &self,
        id: &CategoryId,
        update: CategoryUpdate,
    ) -> impl Future<Output = Result<Category, RemoteError>> + Send;

    fn delete_category(&self, id: &CategoryId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn insert_banner(&self, banner: NewBanner) -> impl Future<Output = Result<Banner, RemoteError>> + Send;

    fn update_banner(
        &self,
        id: &BannerId,
        update: BannerUpdate,
    ) -> impl Future<Output = Result<Banner, RemoteError>> + Send;

    fn delete_banner(&self, id: &BannerId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    fn insert_product_image(
        &self,
        image: NewProductImage,
    ) -> impl Future<Output = Result<ProductImage, RemoteError>> + Send;

    fn update_product_image(
        &self,
        id: &ProductImageId,
        update: ProductImageUpdate,
    ) -> impl Future<Output = Result<ProductImage, RemoteError>> + Send;

    fn delete_product_image(&self, id: &ProductImageId) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
