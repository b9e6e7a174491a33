//! Repository trait definitions.

use catalog_core::{
    CatalogResult, Interface, Page, PageRequest, Product, ProductDraft, ProductId,
};
use async_trait::async_trait;

/// Row filter for product listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Only products in the category with this name.
    pub category: Option<String>,
}

impl ProductFilter {
    /// Filter on a category name.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
        }
    }
}

/// Product repository trait.
///
/// Listings are ordered by product name, then id, so pages are stable.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>>;

    /// Returns one page of the filtered products plus the filtered total.
    async fn find_page(&self, filter: ProductFilter, page: PageRequest)
        -> CatalogResult<Page<Product>>;

    /// Creates the product, creating its category by name if needed.
    ///
    /// Runs in one transaction.
    async fn create(&self, draft: ProductDraft) -> CatalogResult<Product>;

    /// Replaces every field of an existing product, creating the category
    /// by name if needed. Returns `None` if the product does not exist.
    ///
    /// Runs in one transaction.
    async fn update(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<Option<Product>>;

    /// Deletes a product. Returns `false` if it did not exist.
    async fn delete(&self, id: ProductId) -> CatalogResult<bool>;
}
