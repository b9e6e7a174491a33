//! JSON codec for cached values.
//!
//! Only the types marked [`Cacheable`] can be written to or read from the
//! cache. Ids encode as their canonical string form and prices as JSON
//! numbers (see [`catalog_core::Price`] for how the float is restored).

use super::CacheError;
use crate::dto::{ListingResult, ProductRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

mod sealed {
    pub trait Sealed {}
}

/// Marker for values that may be stored in the cache.
///
/// Sealed: the set of cacheable types is closed.
pub trait Cacheable: Serialize + DeserializeOwned + Send + Sync + sealed::Sealed {}

impl sealed::Sealed for ProductRecord {}
impl Cacheable for ProductRecord {}

impl sealed::Sealed for ListingResult {}
impl Cacheable for ListingResult {}

/// Encodes a value for storage.
pub fn encode<T: Cacheable>(value: &T) -> Result<String, CacheError> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a stored value. Absent or empty input is `None`.
pub fn decode<T: Cacheable>(text: Option<&str>) -> Result<Option<T>, CacheError> {
    match text {
        None | Some("") => Ok(None),
        Some(text) => Ok(Some(serde_json::from_str(text)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::{CategoryId, ProductId};

    fn record(price: &str) -> ProductRecord {
        ProductRecord {
            id: ProductId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "Book 1".to_string(),
            category_id: CategoryId::parse("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap(),
            price: price.parse().unwrap(),
            stock: 10,
            description: String::new(),
        }
    }

    #[test]
    fn test_encoding_shape() {
        let text = encode(&record("200.00")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["id"], "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(json["category_id"], "6ba7b810-9dad-11d1-80b4-00c04fd430c8");
        assert!(json["price"].is_number());
        assert_eq!(json["price"].as_f64(), Some(200.0));
    }

    #[test]
    fn test_record_round_trip_preserves_canonical_forms() {
        let original = record("19.99");
        let decoded: ProductRecord = decode(Some(&encode(&original).unwrap())).unwrap().unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
        assert_eq!(decoded.price.to_string(), "19.99");
    }

    #[test]
    fn test_listing_round_trip() {
        let listing = ListingResult {
            results: vec![record("50.00"), record("150.00")],
            count: 2,
            total_pages: 1,
            page: 1,
            page_size: 10,
        };
        let decoded: ListingResult = decode(Some(&encode(&listing).unwrap())).unwrap().unwrap();
        assert_eq!(decoded, listing);
    }

    #[test]
    fn test_absent_and_empty_decode_to_none() {
        assert_eq!(decode::<ProductRecord>(None).unwrap(), None);
        assert_eq!(decode::<ProductRecord>(Some("")).unwrap(), None);
    }

    #[test]
    fn test_empty_listing_is_not_none() {
        let empty = ListingResult {
            results: vec![],
            count: 0,
            total_pages: 1,
            page: 1,
            page_size: 10,
        };
        let decoded = decode::<ListingResult>(Some(&encode(&empty).unwrap())).unwrap();
        assert_eq!(decoded, Some(empty));
    }

    #[test]
    fn test_malformed_input_is_codec_error() {
        let err = decode::<ProductRecord>(Some("{not json")).unwrap_err();
        assert!(matches!(err, CacheError::Codec(_)));
        assert!(!err.is_unavailable());
    }
}
