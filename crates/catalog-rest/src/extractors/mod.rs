//! Custom Axum extractors.

mod product_id;
mod validated;

pub use product_id::*;
pub use validated::*;
