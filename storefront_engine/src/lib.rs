//! Storefront Engine
//!
//! The storefront engine holds the catalog logic of the shop: product listings with filters, product detail,
//! categories, hero banners and the admin back-office that edits them. All persistence lives in a hosted data service;
//! the engine only ever talks to it through the backend traits in [`mod@traits`].
//!
//! The library is divided into these sections:
//! 1. Backends ([`mod@db`]). [`HostedCatalog`] speaks to the hosted service over REST. An in-memory backend is
//!    available behind the `memory` feature for tests and local development.
//! 2. The query cache ([`mod@cache`]). Reads are keyed by a [`Fingerprint`](cache::Fingerprint) and kept until a
//!    mutation invalidates them. Concurrent reads of the same fingerprint share a single remote call.
//! 3. The public API ([`mod@sf_api`]). [`CatalogApi`] serves reads through the cache, [`AdminApi`] validates and
//!    applies mutations and then invalidates, and [`AuthApi`] checks admin credentials against the hosted auth
//!    service and the configured allowlist.
//! 4. The hero [`mod@carousel`].
//!
//! Successful mutations emit a [`CatalogChangedEvent`](events::CatalogChangedEvent). Hook into them via
//! [`EventHooks`](events::EventHooks).
pub mod cache;
pub mod carousel;
mod db;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod sf_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "hosted")]
pub use db::hosted::HostedCatalog;
#[cfg(any(feature = "memory", test))]
pub use db::memory::MemoryCatalog;
pub use sf_api::{
    admin_api::AdminApi,
    admin_objects,
    auth_api::AuthApi,
    catalog_api::CatalogApi,
    errors::{AdminApiError, AuthApiError, CatalogApiError},
    query_objects,
};
pub use traits::{CatalogBackend, RemoteError};
