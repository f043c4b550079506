//! Domain types and pure tree logic shared by the db and api crates.

pub mod activity_tree;
pub mod error;
pub mod types;
