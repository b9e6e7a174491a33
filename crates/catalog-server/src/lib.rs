//! # Catalog Server Library
//!
//! Dependency injection wiring, application assembly and startup
//! utilities for the product catalog server.

pub mod app;
pub mod di;
pub mod startup;
