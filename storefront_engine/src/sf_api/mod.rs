//! # Storefront public API
//!
//! * [`catalog_api`] serves catalog reads through the query cache.
//! * [`admin_api`] validates and applies back-office writes and invalidates the cache afterwards.
//! * [`auth_api`] signs admins in and verifies their tokens.
//! * [`resolver`] turns the shopper's filter into a backend-neutral [`query_objects::ProductQuery`].
//!
//! Every API is built the same way: hand it a backend that implements the traits it needs, plus the shared
//! [`CatalogCache`](crate::cache::CatalogCache) for the catalog and admin APIs.
//!
//! ```rust,ignore
//! let cache = CatalogCache::new();
//! let db = HostedCatalog::new(HostedStoreApi::new(config)?);
//! let catalog = CatalogApi::new(db.clone(), cache.clone());
//! let admin = AdminApi::new(db, cache);
//! let shirts = catalog.products(&CatalogFilter::default().with_category("camisas")).await?;
//! ```
pub mod admin_api;
pub mod admin_objects;
pub mod auth_api;
pub mod catalog_api;
pub mod errors;
pub mod query_objects;
pub mod resolver;
