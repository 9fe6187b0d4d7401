//! # Storefront server
//! This crate hosts the HTTP server for the storefront. It is responsible for:
//! Serving the public catalog: product listings, product detail with its purchase link, categories, banners and the
//! hero carousel.
//! Signing back-office users in through the hosted auth service.
//! Accepting catalog changes from authenticated admins and passing them on to the [`storefront_engine`].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/auth/login`: Exchanges an admin's e-mail and password for an access token.
//! * `/api/...`: The public catalog. No authentication.
//! * `/admin/...`: The back-office. Every request needs an `Authorization: Bearer` header carrying an admin's access
//!   token.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;

pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
