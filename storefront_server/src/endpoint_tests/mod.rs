mod admin;
mod auth;
mod catalog;
mod helpers;
