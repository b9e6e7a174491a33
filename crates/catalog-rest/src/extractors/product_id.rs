//! Product ID path extractor.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use catalog_core::{CatalogError, ProductId};

/// A product ID taken from the `{id}` path segment.
///
/// A segment that is not a UUID is rejected with 400.
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

#[async_trait]
impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError(CatalogError::validation(e.body_text())))?;

        ProductId::parse(&raw)
            .map(Self)
            .map_err(|_| AppError(CatalogError::validation(format!("Invalid product ID: {}", raw))))
    }
}
