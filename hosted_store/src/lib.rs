//! Client for the hosted service that stores the storefront's data.
//!
//! The service exposes three surfaces, all over HTTPS:
//! * a row API (`/rest/v1/{table}`) with PostgREST-style filters and ordering,
//! * object storage (`/storage/v1/object/{bucket}/{key}`) with public URLs,
//! * password sign-in and access token verification (`/auth/v1`).
//!
//! This crate knows nothing about products or banners. Row types are supplied by the caller.
mod api;
mod config;
mod data_objects;
mod error;
mod query;

pub use api::HostedStoreApi;
pub use config::HostedStoreConfig;
pub use data_objects::{AuthSession, AuthUser};
pub use error::HostedStoreError;
pub use query::{Direction, RowQuery};
