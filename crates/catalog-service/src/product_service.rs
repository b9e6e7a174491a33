//! Product service trait definition.

use crate::dto::{Cached, ListingQuery, ListingResult, ProductRecord};
use async_trait::async_trait;
use catalog_core::{CatalogResult, Interface, ProductDraft, ProductId};

/// Product catalog operations.
///
/// Reads are served from the cache when possible and report whether they
/// were. Writes always go to the store.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Lists one page of products, optionally filtered by category and price.
    async fn list_products(&self, query: ListingQuery) -> CatalogResult<Cached<ListingResult>>;

    /// Gets a product by ID.
    async fn get_product(&self, id: ProductId) -> CatalogResult<Cached<ProductRecord>>;

    /// Creates a product.
    async fn create_product(&self, draft: ProductDraft) -> CatalogResult<ProductRecord>;

    /// Replaces every field of a product.
    async fn update_product(&self, id: ProductId, draft: ProductDraft)
        -> CatalogResult<ProductRecord>;

    /// Deletes a product.
    async fn delete_product(&self, id: ProductId) -> CatalogResult<()>;
}
