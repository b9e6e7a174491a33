//! Product service implementation.

use crate::cache::{CacheExt, CacheInterface, CacheKey, CacheKeys, Cacheable};
use crate::dto::{Cached, ListingParams, ListingQuery, ListingResult, ProductRecord};
use crate::metrics::RequestTimer;
use crate::product_service::ProductService;
use async_trait::async_trait;
use catalog_core::{CatalogError, CatalogResult, ProductDraft, ProductId, ValidateExt};
use catalog_repository::{ProductFilter, ProductRepository};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default expiry of cached listing pages.
pub const LISTING_TTL: Duration = Duration::from_secs(600);

/// Cache-aside product service.
///
/// Reads check the cache, fall back to the repository on a miss and
/// repopulate the cache afterwards. Updates and deletes commit first, then
/// drop the product's detail entry and every cached listing. Creates do not
/// invalidate: listings cached before the create stay stale until their
/// TTL runs out.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceImpl {
    #[shaku(inject)]
    repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheInterface>,
    keys: CacheKeys,
    #[shaku(default = LISTING_TTL)]
    listing_ttl: Duration,
}

impl ProductServiceImpl {
    /// Creates a service with the default key prefix and listing TTL.
    pub fn new(repository: Arc<dyn ProductRepository>, cache: Arc<dyn CacheInterface>) -> Self {
        Self {
            repository,
            cache,
            keys: CacheKeys::default(),
            listing_ttl: LISTING_TTL,
        }
    }

    /// Uses a different cache key namespace.
    #[must_use]
    pub fn with_keys(mut self, keys: CacheKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Uses a different listing TTL.
    #[must_use]
    pub fn with_listing_ttl(mut self, ttl: Duration) -> Self {
        self.listing_ttl = ttl;
        self
    }

    async fn list(&self, params: ListingParams) -> CatalogResult<Cached<ListingResult>> {
        let page = params.page;
        let key = self
            .keys
            .listing(params.category.as_deref(), page.page, page.size);

        if let Some(cached) = self.cache.get_cached::<ListingResult>(&key).await? {
            return Ok(Cached::hit(cached.filter_price(params.price)));
        }

        let filter = params
            .category
            .map(ProductFilter::category)
            .unwrap_or_default();
        let products = self.repository.find_page(filter, page).await?;

        if products.is_out_of_range() {
            return Err(CatalogError::validation(format!(
                "Invalid page number: {} (last page is {})",
                page.page,
                products.total_pages()
            )));
        }

        let listing = ListingResult::from(products);
        self.store(&key, &listing, Some(self.listing_ttl)).await;

        Ok(Cached::miss(listing.filter_price(params.price)))
    }

    async fn get(&self, id: ProductId) -> CatalogResult<Cached<ProductRecord>> {
        let key = self.keys.detail(id);

        if let Some(cached) = self.cache.get_cached::<ProductRecord>(&key).await? {
            return Ok(Cached::hit(cached));
        }

        let record = self
            .repository
            .find_by_id(id)
            .await?
            .map(ProductRecord::from)
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        self.store(&key, &record, None).await;
        Ok(Cached::miss(record))
    }

    async fn create(&self, draft: ProductDraft) -> CatalogResult<ProductRecord> {
        draft.validate_request()?;

        let product = self.repository.create(draft).await?;

        info!("Product created: {}", product.id);
        Ok(ProductRecord::from(product))
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<ProductRecord> {
        draft.validate_request()?;

        let product = self
            .repository
            .update(id, draft)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", id))?;

        self.invalidate_product(id).await;

        info!("Product updated: {}", id);
        Ok(ProductRecord::from(product))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<()> {
        if !self.repository.delete(id).await? {
            return Err(CatalogError::not_found("Product", id));
        }

        self.invalidate_product(id).await;

        info!("Product deleted: {}", id);
        Ok(())
    }

    /// Repopulates the cache after a store read. The read already succeeded,
    /// so a failure here is only logged.
    async fn store<T: Cacheable>(&self, key: &CacheKey, value: &T, ttl: Option<Duration>) {
        if let Err(e) = self.cache.set_cached(key, value, ttl).await {
            warn!(key = %key, error = %e, "Could not repopulate cache");
        }
    }

    /// Drops the detail entry and every listing after a committed mutation.
    async fn invalidate_product(&self, id: ProductId) {
        let detail = self.keys.detail(id);
        if let Err(e) = self.cache.invalidate(detail.as_str()).await {
            warn!(key = %detail, error = %e, "Could not invalidate product detail");
        }

        let listings = self.keys.listing_pattern();
        match self.cache.invalidate(&listings).await {
            Ok(deleted) => debug!("Invalidated {} cached listings", deleted),
            Err(e) => warn!(pattern = %listings, error = %e, "Could not invalidate listings"),
        }
    }
}

fn finish<T>(timer: RequestTimer, result: &CatalogResult<Cached<T>>) {
    timer.finish(result.as_ref().is_ok_and(|cached| cached.cache_hit));
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn list_products(&self, query: ListingQuery) -> CatalogResult<Cached<ListingResult>> {
        debug!("Listing products: {:?}", query);
        let timer = RequestTimer::start("list_products");

        let result = match query.parse() {
            Ok(params) => self.list(params).await,
            Err(e) => Err(e),
        };

        finish(timer, &result);
        result
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Cached<ProductRecord>> {
        debug!("Getting product: {}", id);
        let timer = RequestTimer::start("get_product");

        let result = self.get(id).await;

        finish(timer, &result);
        result
    }

    async fn create_product(&self, draft: ProductDraft) -> CatalogResult<ProductRecord> {
        debug!("Creating product: {}", draft.name);
        let timer = RequestTimer::start("create_product");

        let result = self.create(draft).await;

        timer.finish(false);
        result
    }

    async fn update_product(
        &self,
        id: ProductId,
        draft: ProductDraft,
    ) -> CatalogResult<ProductRecord> {
        debug!("Updating product: {}", id);
        let timer = RequestTimer::start("update_product");

        let result = self.update(id, draft).await;

        timer.finish(false);
        result
    }

    async fn delete_product(&self, id: ProductId) -> CatalogResult<()> {
        debug!("Deleting product: {}", id);
        let timer = RequestTimer::start("delete_product");

        let result = self.delete(id).await;

        timer.finish(false);
        result
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl")
            .field("keys", &self.keys)
            .field("listing_ttl", &self.listing_ttl)
            .finish_non_exhaustive()
    }
}
