//! In-memory product repository for tests.

use crate::{ProductFilter, ProductRepository};
use async_trait::async_trait;
use catalog_core::{
    CatalogResult, Category, CategoryId, Page, PageRequest, Product, ProductDraft, ProductId,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
struct Tables {
    categories: HashMap<String, Category>,
    products: HashMap<ProductId, Product>,
}

impl Tables {
    fn get_or_create_category(&mut self, name: &str) -> CategoryId {
        self.categories
            .entry(name.to_string())
            .or_insert_with(|| Category::new(name))
            .id
    }

    fn category_name(&self, id: CategoryId) -> Option<&str> {
        self.categories
            .values()
            .find(|c| c.id == id)
            .map(|c| c.name.as_str())
    }
}

/// Product repository backed by hash maps.
///
/// Counts the reads that reach it so tests can tell cache hits from
/// store reads.
#[derive(Default)]
pub struct InMemoryProductRepository {
    tables: Mutex<Tables>,
    reads: AtomicUsize,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_id` and `find_page` calls served so far.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of stored products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.lock().products.len()
    }

    /// Returns true if no products are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if a category with this name has been created.
    #[must_use]
    pub fn has_category(&self, name: &str) -> bool {
        self.tables.lock().categories.contains_key(name)
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.tables.lock().products.get(&id).cloned())
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let tables = self.tables.lock();

        let mut matching: Vec<Product> = tables
            .products
            .values()
            .filter(|p| match &filter.category {
                Some(name) => tables.category_name(p.category_id) == Some(name.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        let count = matching.len() as u64;
        let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let content = matching
            .into_iter()
            .skip(start)
            .take(page.size as usize)
            .collect();

        Ok(Page::new(content, page, count))
    }

    async fn create(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let mut tables = self.tables.lock();
        let category_id = tables.get_or_create_category(&draft.category);
        let product = Product::from_draft(ProductId::new(), category_id, draft);
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<Option<Product>> {
        let mut tables = self.tables.lock();
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        let category_id = tables.get_or_create_category(&draft.category);
        let product = Product::from_draft(id, category_id, draft);
        tables.products.insert(id, product.clone());
        Ok(Some(product))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        Ok(self.tables.lock().products.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, category: &str, price: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: category.to_string(),
            price: price.parse().unwrap(),
            stock: 1,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_create_reuses_category() {
        let repo = InMemoryProductRepository::new();
        let a = repo.create(draft("A", "Books", "1.00")).await.unwrap();
        let b = repo.create(draft("B", "Books", "2.00")).await.unwrap();
        assert_eq!(a.category_id, b.category_id);
        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn test_find_page_orders_by_name_and_filters() {
        let repo = InMemoryProductRepository::new();
        repo.create(draft("C", "Books", "1.00")).await.unwrap();
        repo.create(draft("A", "Books", "1.00")).await.unwrap();
        repo.create(draft("B", "Games", "1.00")).await.unwrap();

        let page = repo
            .find_page(ProductFilter::default(), PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.count, 3);
        let names: Vec<_> = page.content.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B"]);

        let books = repo
            .find_page(ProductFilter::category("Books"), PageRequest::new(1, 10))
            .await
            .unwrap();
        assert_eq!(books.count, 2);
        assert_eq!(repo.reads(), 2);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryProductRepository::new();
        let result = repo
            .update(ProductId::new(), draft("A", "Books", "1.00"))
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(!repo.has_category("Books"));
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryProductRepository::new();
        let product = repo.create(draft("A", "Books", "1.00")).await.unwrap();
        assert!(repo.delete(product.id).await.unwrap());
        assert!(!repo.delete(product.id).await.unwrap());
        assert!(repo.is_empty());
    }
}
