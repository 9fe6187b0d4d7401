//! # Backend contracts
//!
//! These traits describe what the storefront needs from the hosted data service. The engine never talks to the
//! service directly; it goes through a backend that implements them.
//!
//! * [`CategoryLookup`] resolves a category slug to its id. The filter resolver only needs this one call.
//! * [`CatalogQueries`] covers every read: product lists described by a
//!   [`ProductQuery`](crate::sf_api::query_objects::ProductQuery), product detail, categories and banners.
//! * [`CatalogMutations`] is the single writer: one insert, update and delete per entity collection.
//! * [`ObjectStorage`] stores uploaded images and hands back their public URL.
//! * [`AuthManagement`] signs admins in and verifies their access tokens.
//!
//! [`CatalogBackend`] bundles the data traits. Both [`HostedCatalog`](crate::HostedCatalog) and the in-memory
//! backend implement all of them.
mod auth_management;
mod catalog_mutations;
mod catalog_queries;
mod object_storage;
mod remote_error;

pub use auth_management::{AdminIdentity, AdminSession, AuthManagement};
pub use catalog_mutations::CatalogMutations;
pub use catalog_queries::{CatalogQueries, CategoryLookup};
pub use object_storage::ObjectStorage;
pub use remote_error::RemoteError;

/// Everything the catalog and admin APIs need from a data backend.
pub trait CatalogBackend: CatalogQueries + CatalogMutations + ObjectStorage + Clone + Send + Sync + 'static {}

impl<T> CatalogBackend for T where T: CatalogQueries + CatalogMutations + ObjectStorage + Clone + Send + Sync + 'static {}
