//! HTTP request handlers, one module per resource.

pub mod activity;
pub mod auth;
pub mod file;
pub mod project;
pub mod user;
