use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use hosted_store::HostedStoreApi;
use log::*;
use storefront_engine::{
    cache::CatalogCache,
    events::{EventHandlers, EventHooks, EventProducers},
    traits::AuthManagement,
    AdminApi,
    AuthApi,
    CatalogApi,
    CatalogBackend,
    HostedCatalog,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::AdminGuardFactory,
    routes::{
        health,
        AddProductImageRoute,
        AdminBannersRoute,
        AdminProductsRoute,
        BannersRoute,
        CatalogRoute,
        CategoriesRoute,
        CreateBannerRoute,
        CreateCategoryRoute,
        CreateProductRoute,
        DashboardRoute,
        DeleteBannerRoute,
        DeleteCategoryRoute,
        DeleteProductRoute,
        HeroRoute,
        LoginRoute,
        ProductRoute,
        RemoveProductImageRoute,
        UpdateBannerRoute,
        UpdateCategoryRoute,
        UpdateProductImageRoute,
        UpdateProductRoute,
        UploadImageRoute,
    },
};

/// Largest image the back-office may upload in one request.
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let api = HostedStoreApi::new(config.hosted.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Catalog backend is {}", api.config().url);
    let db = HostedCatalog::new(api);
    let producers = start_event_handlers(config.event_buffer_size);
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Registers the default event hooks and spawns their handlers. Must be called from within a tokio runtime.
pub fn start_event_handlers(buffer_size: usize) -> EventProducers {
    let mut hooks = EventHooks::default();
    hooks
        .on_catalog_changed(|ev| {
            Box::pin(async move {
                info!("📬️ {} {} was {:?}", ev.entity, ev.id, ev.action);
            })
        })
        .on_image_uploaded(|ev| {
            Box::pin(async move {
                info!("📬️ New image at {}", ev.public_url);
            })
        });
    let handlers = EventHandlers::new(buffer_size, hooks);
    let producers = handlers.producers();
    handlers.start_handlers();
    producers
}

pub fn create_server_instance<B>(config: ServerConfig, db: B, producers: EventProducers) -> Result<Server, ServerError>
where B: CatalogBackend + AuthManagement {
    // One cache for all workers, so that a write handled by one worker invalidates reads served by the others.
    let cache = CatalogCache::with_capacity(config.cache_capacity);
    let auth_api = AuthApi::new(db.clone(), config.admin_emails.iter());
    let store = web::Data::new(config.store.clone());
    let srv = HttpServer::new(move || {
        let catalog_api = CatalogApi::new(db.clone(), cache.clone());
        let admin_api = AdminApi::new(db.clone(), cache.clone()).with_producers(producers.clone());
        let auth_api = auth_api.clone();
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("storefront::access_log"))
            .app_data(web::Data::new(catalog_api))
            .app_data(web::Data::new(admin_api))
            .app_data(web::Data::new(auth_api.clone()))
            .app_data(store.clone())
            .app_data(json_config())
            .app_data(web::PayloadConfig::new(MAX_UPLOAD_SIZE))
            .configure(|cfg| configure_routes::<B>(cfg, auth_api))
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Mounts every route. The caller provides the `CatalogApi`, `AdminApi`, `AuthApi` and `StoreSettings` app data.
pub fn configure_routes<B>(cfg: &mut web::ServiceConfig, auth_api: AuthApi<B>)
where B: CatalogBackend + AuthManagement {
    let public_scope = web::scope("/api")
        .service(CatalogRoute::<B>::new())
        .service(ProductRoute::<B>::new())
        .service(CategoriesRoute::<B>::new())
        .service(BannersRoute::<B>::new())
        .service(HeroRoute::<B>::new());
    let admin_scope = web::scope("/admin")
        .wrap(AdminGuardFactory::new(auth_api))
        .service(DashboardRoute::<B>::new())
        .service(AdminProductsRoute::<B>::new())
        .service(CreateProductRoute::<B>::new())
        .service(UpdateProductRoute::<B>::new())
        .service(DeleteProductRoute::<B>::new())
        .service(AddProductImageRoute::<B>::new())
        .service(UpdateProductImageRoute::<B>::new())
        .service(RemoveProductImageRoute::<B>::new())
        .service(CreateCategoryRoute::<B>::new())
        .service(UpdateCategoryRoute::<B>::new())
        .service(DeleteCategoryRoute::<B>::new())
        .service(AdminBannersRoute::<B>::new())
        .service(CreateBannerRoute::<B>::new())
        .service(UpdateBannerRoute::<B>::new())
        .service(DeleteBannerRoute::<B>::new())
        .service(UploadImageRoute::<B>::new());
    cfg.service(health).service(LoginRoute::<B>::new()).service(public_scope).service(admin_scope);
}

/// Malformed JSON bodies are answered with the same `{"error": ..}` shape as every other failure.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!("💻️ Could not deserialize request body. {err}");
        ServerError::InvalidRequestBody(err.to_string()).into()
    })
}
