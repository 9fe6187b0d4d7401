//! An in-process stand-in for the hosted service.
//!
//! `MemoryCatalog` implements every backend trait against plain vectors. It behaves like the hosted service where the
//! engine can observe it: ordering, foreign keys on insert and update, updates of missing rows failing, deletes that
//! do not cascade. It also counts calls, can inject failures and can add latency, which is what the tests use it for.
mod state;

use std::{
    collections::{HashMap, VecDeque},
    fmt::Debug,
    sync::Arc,
    time::Duration,
};

use bytes::Bytes;
use log::*;
use parking_lot::{Mutex, RwLock};

use self::state::{MemoryState, MemoryUser, StoredObject};
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

pub const PUBLIC_URL_BASE: &str = "http://localhost/storage/v1/object/public/images";
const TOKEN_LIFETIME_SECS: u64 = 3600;

#[derive(Default)]
struct Control {
    latency: Option<Duration>,
    failures: VecDeque<RemoteError>,
    calls: HashMap<&'static str, usize>,
}

#[derive(Clone, Default)]
pub struct MemoryCatalog {
    state: Arc<RwLock<MemoryState>>,
    control: Arc<Mutex<Control>>,
}

impl Debug for MemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        write!(
            f,
            "MemoryCatalog ({} products, {} categories, {} banners)",
            state.products.len(),
            state.categories.len(),
            state.banners.len()
        )
    }
}

fn new_id() -> String {
    let a = rand::random::<u128>();
    let hex = format!("{a:032x}");
    format!("{}-{}-{}-{}-{}", &hex[0..8], &hex[8..12], &hex[12..16], &hex[16..20], &hex[20..32])
}

fn not_found(table: &str, id: &str) -> RemoteError {
    RemoteError::with_status(406, format!("No {table} row with id {id}"))
}

fn foreign_key(table: &str, column: &str, id: &str) -> RemoteError {
    RemoteError::with_status(409, format!("{table}.{column} refers to a missing row ({id})"))
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    //------------------------------------   Test controls    ----------------------------------------------------------

    /// Every subsequent call waits this long before touching the data.
    pub fn set_latency(&self, latency: Duration) {
        self.control.lock().latency = Some(latency);
    }

    /// The next call fails with `error`. Queued failures are consumed one per call.
    pub fn fail_next(&self, error: RemoteError) {
        self.control.lock().failures.push_back(error);
    }

    /// How many times the named trait method has been called, e.g. `"fetch_products"`.
    pub fn call_count(&self, method: &str) -> usize {
        self.control.lock().calls.get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.control.lock().calls.values().sum()
    }

    pub fn reset_call_counts(&self) {
        self.control.lock().calls.clear();
    }

    async fn begin(&self, method: &'static str) -> Result<(), RemoteError> {
        let latency = {
            let mut control = self.control.lock();
            *control.calls.entry(method).or_default() += 1;
            control.latency
        };
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match self.control.lock().failures.pop_front() {
            Some(e) => {
                debug!("🗃️ Injected failure for {method}: {e}");
                Err(e)
            },
            None => Ok(()),
        }
    }

    //------------------------------------      Seeding       ----------------------------------------------------------

    /// Inserts a category directly, bypassing call counting and failure injection.
    pub fn seed_category(&self, category: NewCategory) -> Category {
        let mut state = self.state.write();
        let row = Category {
            id: new_id().into(),
            name: category.name,
            slug: category.slug,
            description: category.description,
            display_order: category.display_order,
            created_at: state.next_timestamp(),
        };
        state.categories.push(row.clone());
        row
    }

    pub fn seed_product(&self, product: NewProduct) -> Product {
        let mut state = self.state.write();
        let now = state.next_timestamp();
        let row = Product {
            id: new_id().into(),
            name: product.name,
            slug: product.slug,
            description: product.description,
            price: product.price,
            category_id: product.category_id,
            is_active: product.is_active,
            is_featured: product.is_featured,
            display_order: product.display_order,
            created_at: now,
            updated_at: now,
            category: None,
            images: vec![],
        };
        state.products.push(row.clone());
        state.joined(&row)
    }

    pub fn seed_banner(&self, banner: NewBanner) -> Banner {
        let mut state = self.state.write();
        let row = Banner {
            id: new_id().into(),
            title: banner.title,
            image_url: banner.image_url,
            link: banner.link,
            is_active: banner.is_active,
            display_order: banner.display_order,
            created_at: state.next_timestamp(),
        };
        state.banners.push(row.clone());
        row
    }

    pub fn seed_product_image(&self, image: NewProductImage) -> ProductImage {
        let row = ProductImage {
            id: new_id().into(),
            product_id: image.product_id,
            image_url: image.image_url,
            display_order: image.display_order,
        };
        self.state.write().images.push(row.clone());
        row
    }

    /// Registers an account with the auth service and returns its user id.
    pub fn add_user<S: Into<String>>(&self, email: S, password: S) -> String {
        let id = new_id();
        let user = MemoryUser { id: id.clone(), email: email.into(), password: password.into() };
        self.state.write().users.push(user);
        id
    }

    /// Invalidates every access token issued so far.
    pub fn revoke_tokens(&self) {
        self.state.write().tokens.clear();
    }

    pub fn stored_object(&self, key: &str) -> Option<(Bytes, String)> {
        self.state.read().objects.get(key).map(|o| (o.data.clone(), o.content_type.clone()))
    }

    pub fn product_count(&self) -> usize {
        self.state.read().products.len()
    }

    pub fn banner_count(&self) -> usize {
        self.state.read().banners.len()
    }

    pub fn image_count(&self) -> usize {
        self.state.read().images.len()
    }

    fn check_category(&self, category_id: Option<&CategoryId>) -> Result<(), RemoteError> {
        match category_id {
            Some(id) if !self.state.read().categories.iter().any(|c| &c.id == id) => {
                Err(foreign_key("products", "category_id", id.as_str()))
            },
            _ => Ok(()),
        }
    }
}

impl CategoryLookup for MemoryCatalog {
    async fn fetch_category_id_by_slug(&self, slug: &str) -> Result<Option<CategoryId>, RemoteError> {
        self.begin("fetch_category_id_by_slug").await?;
        let state = self.state.read();
        Ok(state.categories.iter().find(|c| c.slug == slug).map(|c| c.id.clone()))
    }
}

impl CatalogQueries for MemoryCatalog {
    async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, RemoteError> {
        self.begin("fetch_products").await?;
        let products = self.state.read().select_products(query);
        trace!("🗃️ {} products match the query", products.len());
        Ok(products)
    }

    async fn fetch_product_by_slug(&self, slug: &str) -> Result<Option<Product>, RemoteError> {
        self.begin("fetch_product_by_slug").await?;
        let state = self.state.read();
        Ok(state.products.iter().find(|p| p.slug == slug).map(|p| state.joined(p)))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, RemoteError> {
        self.begin("fetch_categories").await?;
        let mut categories = self.state.read().categories.clone();
        categories.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)));
        Ok(categories)
    }

    async fn fetch_banners(&self, active_only: bool) -> Result<Vec<Banner>, RemoteError> {
        self.begin("fetch_banners").await?;
        let mut banners =
            self.state.read().banners.iter().filter(|b| b.is_active || !active_only).cloned().collect::<Vec<_>>();
        banners.sort_by(|a, b| a.display_order.cmp(&b.display_order).then_with(|| a.id.cmp(&b.id)));
        Ok(banners)
    }
}

impl CatalogMutations for MemoryCatalog {
    async fn insert_product(&self, product: NewProduct) -> Result<Product, RemoteError> {
        self.begin("insert_product").await?;
        self.check_category(product.category_id.as_ref())?;
        let product = self.seed_product(product);
        debug!("🗃️ Inserted product {}", product.id);
        Ok(product)
    }

    async fn update_product(&self, id: &ProductId, update: ProductUpdate) -> Result<Product, RemoteError> {
        self.begin("update_product").await?;
        if let Some(category_id) = &update.category_id {
            self.check_category(category_id.as_ref())?;
        }
        let mut state = self.state.write();
        let now = state.next_timestamp();
        let row = state.products.iter_mut().find(|p| &p.id == id).ok_or_else(|| not_found("products", id.as_str()))?;
        update.apply_to(row);
        row.updated_at = now;
        let row = row.clone();
        Ok(state.joined(&row))
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), RemoteError> {
        self.begin("delete_product").await?;
        self.state.write().products.retain(|p| &p.id != id);
        Ok(())
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, RemoteError> {
        self.begin("insert_category").await?;
        Ok(self.seed_category(category))
    }

    async fn update_category(&self, id: &CategoryId, update: CategoryUpdate) -> Result<Category, RemoteError> {
        self.begin("update_category").await?;
        let mut state = self.state.write();
        let row =
            state.categories.iter_mut().find(|c| &c.id == id).ok_or_else(|| not_found("categories", id.as_str()))?;
        update.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), RemoteError> {
        self.begin("delete_category").await?;
        self.state.write().categories.retain(|c| &c.id != id);
        Ok(())
    }

    async fn insert_banner(&self, banner: NewBanner) -> Result<Banner, RemoteError> {
        self.begin("insert_banner").await?;
        Ok(self.seed_banner(banner))
    }

    async fn update_banner(&self, id: &BannerId, update: BannerUpdate) -> Result<Banner, RemoteError> {
        self.begin("update_banner").await?;
        let mut state = self.state.write();
        let row = state.banners.iter_mut().find(|b| &b.id == id).ok_or_else(|| not_found("banners", id.as_str()))?;
        update.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_banner(&self, id: &BannerId) -> Result<(), RemoteError> {
        self.begin("delete_banner").await?;
        self.state.write().banners.retain(|b| &b.id != id);
        Ok(())
    }

    async fn insert_product_image(&self, image: NewProductImage) -> Result<ProductImage, RemoteError> {
        self.begin("insert_product_image").await?;
        if !self.state.read().products.iter().any(|p| p.id == image.product_id) {
            return Err(foreign_key("product_images", "product_id", image.product_id.as_str()));
        }
        Ok(self.seed_product_image(image))
    }

    async fn update_product_image(
        &self,
        id: &ProductImageId,
        update: ProductImageUpdate,
    ) -> Result<ProductImage, RemoteError> {
        self.begin("update_product_image").await?;
        let mut state = self.state.write();
        let row =
            state.images.iter_mut().find(|i| &i.id == id).ok_or_else(|| not_found("product_images", id.as_str()))?;
        update.apply_to(row);
        Ok(row.clone())
    }

    async fn delete_product_image(&self, id: &ProductImageId) -> Result<(), RemoteError> {
        self.begin("delete_product_image").await?;
        self.state.write().images.retain(|i| &i.id != id);
        Ok(())
    }
}

impl ObjectStorage for MemoryCatalog {
    async fn upload_object(&self, key: &str, data: Bytes, content_type: &str) -> Result<String, RemoteError> {
        self.begin("upload_object").await?;
        let object = StoredObject { data, content_type: content_type.to_string() };
        self.state.write().objects.insert(key.to_string(), object);
        Ok(format!("{PUBLIC_URL_BASE}/{key}"))
    }
}

impl AuthManagement for MemoryCatalog {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AdminSession, AuthApiError> {
        self.begin("sign_in").await?;
        let mut state = self.state.write();
        let identity = state
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email.trim()) && u.password == password)
            .map(|u| AdminIdentity { user_id: u.id.clone(), email: Some(u.email.clone()) })
            .ok_or(AuthApiError::InvalidCredentials)?;
        let access_token = format!("{:064x}", rand::random::<u128>());
        state.tokens.insert(access_token.clone(), identity.clone());
        Ok(AdminSession { access_token, expires_in: Some(TOKEN_LIFETIME_SECS), identity })
    }

    async fn verify_access_token(&self, token: &str) -> Result<AdminIdentity, AuthApiError> {
        self.begin("verify_access_token").await?;
        self.state.read().tokens.get(token).cloned().ok_or(AuthApiError::InvalidToken)
    }
}
