//! # Catalog Service
//!
//! Product service layer with a read-through, write-invalidate cache.
//!
//! Reads consult the cache first and fall back to the repository on a miss,
//! repopulating the cache afterwards. Updates and deletes invalidate the
//! product's detail entry and every cached listing once the database
//! transaction has committed. The cache is an accelerator only: when Redis
//! is unreachable every cache operation degrades to its miss/no-op default.

pub mod cache;
pub mod dto;
pub mod metrics;
pub mod product_service;
pub mod r#impl;

pub use cache::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::{ProductServiceImpl, ProductServiceImplParameters};
