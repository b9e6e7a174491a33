//! # Catalog Repository
//!
//! Data access for the product catalog.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>  (domain interface)
//! PgProductRepository              (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! Every mutation runs in a single transaction scoped to that mutation.
//! [`InMemoryProductRepository`] mirrors the same contract for tests and is
//! available behind the `test-utils` feature.

pub mod pool;
pub mod postgres;
pub mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

pub use pool::*;
pub use postgres::*;
pub use traits::*;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::InMemoryProductRepository;
