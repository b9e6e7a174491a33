//! Product-related DTOs.

use catalog_core::{
    CatalogError, CatalogResult, Category, CategoryId, Page, PageRequest, Price, Product,
    ProductId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

/// Flat product record, as returned by the API and stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProductRecord {
    #[schema(value_type = String, format = Uuid)]
    pub id: ProductId,
    pub name: String,
    #[schema(value_type = String, format = Uuid)]
    pub category_id: CategoryId,
    #[schema(value_type = f64, example = 19.99)]
    pub price: Price,
    pub stock: u32,
    pub description: String,
}

impl From<Product> for ProductRecord {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            category_id: product.category_id,
            price: product.price,
            stock: product.stock,
            description: product.description,
        }
    }
}

/// One page of a product listing.
///
/// `count` and `total_pages` describe the category-filtered population,
/// before any price bounds are applied to `results`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListingResult {
    pub results: Vec<ProductRecord>,
    pub count: u64,
    pub total_pages: u64,
    pub page: u32,
    pub page_size: u32,
}

impl ListingResult {
    /// Keeps only the results priced within `bounds`.
    #[must_use]
    pub fn filter_price(mut self, bounds: PriceBounds) -> Self {
        if !bounds.is_unbounded() {
            self.results.retain(|record| bounds.contains(record.price));
        }
        self
    }
}

impl From<Page<Product>> for ListingResult {
    fn from(page: Page<Product>) -> Self {
        let total_pages = page.total_pages();
        let request = page.request;
        Self {
            count: page.count,
            total_pages,
            page: request.page,
            page_size: request.size,
            results: page.content.into_iter().map(ProductRecord::from).collect(),
        }
    }
}

/// Raw listing query parameters, exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListingQuery {
    /// Category name; `all` or absent lists every category.
    pub category: Option<String>,
    /// Page number, 1-indexed (default 1).
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
    /// Page size, 1 to 100 (default 10).
    #[param(value_type = Option<u32>)]
    pub page_size: Option<String>,
    /// Inclusive lower price bound, applied within the page.
    #[param(value_type = Option<f64>)]
    pub price_min: Option<String>,
    /// Inclusive upper price bound, applied within the page.
    #[param(value_type = Option<f64>)]
    pub price_max: Option<String>,
}

impl ListingQuery {
    /// Query for one page of a category.
    #[must_use]
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            category: Some(name.into()),
            ..Self::default()
        }
    }

    /// Sets the page number and size.
    #[must_use]
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = Some(page.to_string());
        self.page_size = Some(page_size.to_string());
        self
    }

    /// Sets the price bounds.
    #[must_use]
    pub fn price(mut self, min: Option<&str>, max: Option<&str>) -> Self {
        self.price_min = min.map(str::to_string);
        self.price_max = max.map(str::to_string);
        self
    }

    /// Parses and range-checks the parameters.
    pub fn parse(&self) -> CatalogResult<ListingParams> {
        let page = parse_number(self.page.as_deref(), "page", 1)?;
        let page_size = parse_number(
            self.page_size.as_deref(),
            "page_size",
            PageRequest::DEFAULT_SIZE,
        )?;

        if page < 1 {
            return Err(CatalogError::validation("page must be at least 1"));
        }
        if !(1..=PageRequest::MAX_SIZE).contains(&page_size) {
            return Err(CatalogError::validation(format!(
                "page_size must be between 1 and {}",
                PageRequest::MAX_SIZE
            )));
        }

        let category = self
            .category
            .as_deref()
            .filter(|name| !name.is_empty() && !Category::is_reserved_name(name))
            .map(str::to_string);

        Ok(ListingParams {
            category,
            page: PageRequest::new(page, page_size),
            price: PriceBounds {
                min: parse_bound(self.price_min.as_deref(), "price_min")?,
                max: parse_bound(self.price_max.as_deref(), "price_max")?,
            },
        })
    }
}

fn parse_number(raw: Option<&str>, field: &str, default: u32) -> CatalogResult<u32> {
    match raw.map(str::trim) {
        None | Some("") => Ok(default),
        Some(text) => text
            .parse()
            .map_err(|_| CatalogError::validation(format!("{field} must be a positive integer"))),
    }
}

fn parse_bound(raw: Option<&str>, field: &str) -> CatalogResult<Option<Decimal>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map(Some)
            .map_err(|_| CatalogError::validation(format!("{field} must be a number"))),
    }
}

/// Inclusive price range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceBounds {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

impl PriceBounds {
    /// Returns true if neither end is set.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true if `price` lies within the bounds.
    #[must_use]
    pub fn contains(&self, price: Price) -> bool {
        let amount = price.amount();
        self.min.map_or(true, |min| amount >= min) && self.max.map_or(true, |max| amount <= max)
    }
}

/// Validated listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingParams {
    /// Category filter; `None` lists every category.
    pub category: Option<String>,
    pub page: PageRequest,
    pub price: PriceBounds,
}

/// A service result tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cached<T> {
    pub value: T,
    /// True if the value was served from the cache.
    pub cache_hit: bool,
}

impl<T> Cached<T> {
    /// A value served from the cache.
    pub const fn hit(value: T) -> Self {
        Self {
            value,
            cache_hit: true,
        }
    }

    /// A value read from the store.
    pub const fn miss(value: T) -> Self {
        Self {
            value,
            cache_hit: false,
        }
    }

    /// Unwraps the value, dropping the tag.
    pub fn into_inner(self) -> T {
        self.value
    }
}
