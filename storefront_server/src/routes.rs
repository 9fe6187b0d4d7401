//! Request handler definitions
//!
//! Public catalog routes live under `/api`, the back-office routes under `/admin` (mounted behind the admin guard by
//! [`crate::server::configure_routes`]). Handlers only unpack the request and hand over to the engine APIs; every
//! backend call is async, so no handler blocks its worker.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use bytes::Bytes;
use log::*;
use storefront_engine::{
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
    carousel::Slide,
    db_types::{BannerId, CategoryId, ProductId, ProductImageId},
    traits::AuthManagement,
    AdminApi,
    AuthApi,
    CatalogApi,
    CatalogBackend,
};

use crate::{
    config::StoreSettings,
    data_objects::{
        CatalogParams,
        HeroResponse,
        JsonResponse,
        LoginRequest,
        ProductDetail,
        UploadParams,
        UploadResponse,
    },
    errors::ServerError,
    helpers::content_type,
    middleware::AdminUser,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login => Post "/auth/login" impl AuthManagement);
/// Route handler for the back-office login.
///
/// The e-mail and password are checked by the hosted auth service. Only addresses on the admin allowlist get a session;
/// the returned access token goes into the `Authorization: Bearer` header of every `/admin` request.
pub async fn login<A: AuthManagement>(
    body: web::Json<LoginRequest>,
    api: web::Data<AuthApi<A>>,
) -> Result<HttpResponse, ServerError> {
    let LoginRequest { email, password } = body.into_inner();
    debug!("💻️ Login attempt for {email}");
    let session = api.sign_in(&email, &password).await?;
    Ok(HttpResponse::Ok().json(session))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(catalog => Get "/catalog" impl CatalogBackend);
/// Route handler for the public product listing.
///
/// Query parameters (all optional):
/// * `categoria` - a category slug. An unknown slug yields an empty list.
/// * `busca` - case-insensitive substring of the product name.
/// * `ordem` - one of `recent` (default), `featured`, `price_asc` or `price_desc`.
/// * `destaque` - when truthy, only featured products are listed.
pub async fn catalog<B: CatalogBackend>(
    params: web::Query<CatalogParams>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let filter = params.into_inner().into_filter();
    trace!("💻️ GET catalog for {}", filter.fingerprint());
    let products = api.products(&filter).await?;
    Ok(HttpResponse::Ok().json(products.as_ref()))
}

route!(product => Get "/products/{slug}" impl CatalogBackend);
pub async fn product<B: CatalogBackend>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
    settings: web::Data<StoreSettings>,
) -> Result<HttpResponse, ServerError> {
    let slug = path.into_inner();
    trace!("💻️ GET product {slug}");
    let product = api
        .product_by_slug(&slug)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("No product with slug {slug}")))?;
    let detail = ProductDetail::new(product.as_ref().clone(), &settings.whatsapp_number);
    Ok(HttpResponse::Ok().json(detail))
}

route!(categories => Get "/categories" impl CatalogBackend);
pub async fn categories<B: CatalogBackend>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET categories");
    let categories = api.categories().await?;
    Ok(HttpResponse::Ok().json(categories.as_ref()))
}

route!(banners => Get "/banners" impl CatalogBackend);
pub async fn banners<B: CatalogBackend>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET banners");
    let banners = api.banners(true).await?;
    Ok(HttpResponse::Ok().json(banners.as_ref()))
}

route!(hero => Get "/hero" impl CatalogBackend);
/// The hero carousel as the storefront should start it: the slides in display order, the starting index and the
/// number of seconds between slides (zero if there is nothing to rotate). Without active banners the configured
/// fallback image is the only slide.
pub async fn hero<B: CatalogBackend>(
    api: web::Data<CatalogApi<B>>,
    settings: web::Data<StoreSettings>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET hero");
    let carousel = api.hero_carousel(Slide::new(settings.hero_fallback_image.as_str())).await?;
    Ok(HttpResponse::Ok().json(HeroResponse::new(&carousel, settings.hero_interval)))
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(dashboard => Get "/dashboard" impl CatalogBackend);
pub async fn dashboard<B: CatalogBackend>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let stats = api.dashboard_stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

route!(admin_products => Get "/products" impl CatalogBackend);
/// Every product, active or not, in back-office order.
pub async fn admin_products<B: CatalogBackend>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let products = api.admin_products().await?;
    Ok(HttpResponse::Ok().json(products.as_ref()))
}

route!(create_product => Post "/products" impl CatalogBackend);
pub async fn create_product<B: CatalogBackend>(
    admin: AdminUser,
    body: web::Json<ProductInput>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ {admin} is creating a product");
    let product = api.create_product(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

route!(update_product => Patch "/products/{id}" impl CatalogBackend);
pub async fn update_product<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<ProductPatch>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductId::from(path.into_inner());
    debug!("💻️ {admin} is updating product {id}");
    let product = api.update_product(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(product))
}

route!(delete_product => Delete "/products/{id}" impl CatalogBackend);
pub async fn delete_product<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductId::from(path.into_inner());
    debug!("💻️ {admin} is deleting product {id}");
    api.delete_product(&id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Product {id} deleted"))))
}

route!(add_product_image => Post "/products/{id}/images" impl CatalogBackend);
pub async fn add_product_image<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<ProductImageInput>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductId::from(path.into_inner());
    debug!("💻️ {admin} is adding an image to product {id}");
    let image = api.add_product_image(&id, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(image))
}

route!(update_product_image => Patch "/images/{id}" impl CatalogBackend);
pub async fn update_product_image<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<ProductImagePatch>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductImageId::from(path.into_inner());
    debug!("💻️ {admin} is updating image {id}");
    let image = api.update_product_image(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(image))
}

route!(remove_product_image => Delete "/images/{id}" impl CatalogBackend);
pub async fn remove_product_image<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = ProductImageId::from(path.into_inner());
    debug!("💻️ {admin} is removing image {id}");
    api.remove_product_image(&id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Image {id} removed"))))
}

route!(create_category => Post "/categories" impl CatalogBackend);
pub async fn create_category<B: CatalogBackend>(
    admin: AdminUser,
    body: web::Json<CategoryInput>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ {admin} is creating a category");
    let category = api.create_category(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(category))
}

route!(update_category => Patch "/categories/{id}" impl CatalogBackend);
pub async fn update_category<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<CategoryPatch>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = CategoryId::from(path.into_inner());
    debug!("💻️ {admin} is updating category {id}");
    let category = api.update_category(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}

route!(delete_category => Delete "/categories/{id}" impl CatalogBackend);
pub async fn delete_category<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = CategoryId::from(path.into_inner());
    debug!("💻️ {admin} is deleting category {id}");
    api.delete_category(&id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Category {id} deleted"))))
}

route!(admin_banners => Get "/banners" impl CatalogBackend);
/// All banners, including inactive ones.
pub async fn admin_banners<B: CatalogBackend>(api: web::Data<CatalogApi<B>>) -> Result<HttpResponse, ServerError> {
    let banners = api.banners(false).await?;
    Ok(HttpResponse::Ok().json(banners.as_ref()))
}

route!(create_banner => Post "/banners" impl CatalogBackend);
pub async fn create_banner<B: CatalogBackend>(
    admin: AdminUser,
    body: web::Json<BannerInput>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ {admin} is creating a banner");
    let banner = api.create_banner(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(banner))
}

route!(update_banner => Patch "/banners/{id}" impl CatalogBackend);
pub async fn update_banner<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    body: web::Json<BannerPatch>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = BannerId::from(path.into_inner());
    debug!("💻️ {admin} is updating banner {id}");
    let banner = api.update_banner(&id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(banner))
}

route!(delete_banner => Delete "/banners/{id}" impl CatalogBackend);
pub async fn delete_banner<B: CatalogBackend>(
    admin: AdminUser,
    path: web::Path<String>,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = BannerId::from(path.into_inner());
    debug!("💻️ {admin} is deleting banner {id}");
    api.delete_banner(&id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Banner {id} deleted"))))
}

route!(upload_image => Post "/uploads" impl CatalogBackend);
/// Stores the raw request body in the object store under `{folder}/{timestamp}-{random}.{ext}` and returns its public
/// URL. The extension is taken from `filename`; the content type from the request header.
pub async fn upload_image<B: CatalogBackend>(
    admin: AdminUser,
    req: HttpRequest,
    params: web::Query<UploadParams>,
    body: Bytes,
    api: web::Data<AdminApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let UploadParams { folder, filename } = params.into_inner();
    let content_type = content_type(&req);
    debug!("💻️ {admin} is uploading {filename} ({} bytes, {content_type})", body.len());
    let url = api.upload_image(folder.as_deref(), &filename, body, &content_type).await?;
    Ok(HttpResponse::Created().json(UploadResponse { url }))
}
