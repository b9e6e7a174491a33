//! Cache key builder.
//!
//! Key layout is a persisted convention shared with every process that
//! reads or invalidates the cache. Changing the segment order orphans
//! entries written by older builds, so the format is fixed:
//!
//! ```text
//! {prefix}:list:category={name|all}:page={n}:size={n}
//! {prefix}:detail:{product id}
//! ```

use catalog_core::{Category, ProductId};
use std::fmt;

/// Default prefix for all product cache keys.
pub const DEFAULT_PREFIX: &str = "products";

/// A fully built cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builds product cache keys under a namespace prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheKeys {
    prefix: String,
}

impl CacheKeys {
    /// Creates a key builder with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Key of one listing page. An absent category is spelled `all`.
    #[must_use]
    pub fn listing(&self, category: Option<&str>, page: u32, page_size: u32) -> CacheKey {
        CacheKey(format!(
            "{}:list:category={}:page={}:size={}",
            self.prefix,
            category.unwrap_or(Category::ALL),
            page,
            page_size
        ))
    }

    /// Key of one product's detail record.
    #[must_use]
    pub fn detail(&self, id: ProductId) -> CacheKey {
        CacheKey(format!("{}:detail:{}", self.prefix, id))
    }

    /// Glob pattern matching every listing key.
    #[must_use]
    pub fn listing_pattern(&self) -> String {
        format!("{}:list:*", self.prefix)
    }
}

impl Default for CacheKeys {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_listing_key_format() {
        let keys = CacheKeys::default();
        assert_eq!(
            keys.listing(Some("Books"), 2, 10).as_str(),
            "products:list:category=Books:page=2:size=10"
        );
        assert_eq!(
            keys.listing(None, 1, 10).as_str(),
            "products:list:category=all:page=1:size=10"
        );
    }

    #[test]
    fn test_detail_key_format() {
        let id = ProductId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(
            CacheKeys::default().detail(id).as_str(),
            "products:detail:550e8400-e29b-41d4-a716-446655440000"
        );
    }

    #[test]
    fn test_listing_keys_are_deterministic() {
        let a = CacheKeys::default();
        let b = CacheKeys::default();
        assert_eq!(a.listing(Some("Books"), 3, 25), b.listing(Some("Books"), 3, 25));
        assert_eq!(a.listing(None, 1, 10), a.listing(None, 1, 10));
    }

    #[test]
    fn test_distinct_queries_produce_distinct_keys() {
        let keys = CacheKeys::default();
        let mut seen = HashSet::new();
        for category in [None, Some("Books"), Some("Games"), Some("Books:page=1")] {
            for page in 1..=12 {
                for size in [1, 10, 11, 100] {
                    assert!(
                        seen.insert(keys.listing(category, page, size)),
                        "collision for {category:?} {page} {size}"
                    );
                }
            }
        }
        // Page and size digits must not run together.
        assert_ne!(keys.listing(None, 1, 12), keys.listing(None, 11, 2));
    }

    #[test]
    fn test_listing_pattern_matches_listing_prefix() {
        let keys = CacheKeys::new("shop");
        assert_eq!(keys.listing_pattern(), "shop:list:*");
        let key = keys.listing(None, 1, 10);
        assert!(key.as_str().starts_with(keys.listing_pattern().trim_end_matches('*')));
        assert!(!keys
            .detail(ProductId::new())
            .as_str()
            .starts_with(keys.listing_pattern().trim_end_matches('*')));
    }
}
