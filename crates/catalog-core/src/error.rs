//! The catalog error taxonomy.
//!
//! Cache transport failures never reach [`CatalogError`]: the fail-open
//! guard in the service layer absorbs them. What remains are client errors
//! (`NotFound`, `Validation`, `Conflict`) and infrastructure errors, which
//! propagate to the caller unchanged.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every error a catalog operation can return.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row with this id.
    #[error("{resource_type} {id} not found")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Malformed input: paging, price bounds, identifiers or request bodies.
    #[error("invalid request: {0}")]
    Validation(String),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The relational store failed.
    #[error("store failure: {0}")]
    Database(String),

    /// Missing or inconsistent configuration, including an unconfigured cache.
    #[error("misconfigured: {0}")]
    Configuration(String),

    /// A cache failure that is not an outage, such as an undecodable entry.
    #[error("cache failure: {0}")]
    Cache(String),

    #[error("internal failure: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CatalogError {
    /// HTTP status the REST layer answers with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Conflict(_) => 409,
            _ => 500,
        }
    }

    /// Stable machine-readable code for the error envelope.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// `resource_type` with `id` does not exist.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True when the caller's input caused the error.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Validation(_) | Self::Conflict(_)
        )
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        const UNIQUE_VIOLATION: &str = "23505";

        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
                return Self::Conflict(db_err.message().to_string());
            }
        }
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON encoding failed: {}", err))
    }
}

/// The `error` member of a failed API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// One of the codes from [`CatalogError::error_code`], or `INVALID_JSON`.
    pub code: String,
    pub message: String,
    /// Per-field problems, present for rejected request bodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// One rejected request body field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// Validator rule that failed, e.g. `length` or `price_scale`.
    pub code: String,
}

impl ErrorResponse {
    #[must_use]
    pub fn from_error(error: &CatalogError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&CatalogError> for ErrorResponse {
    fn from(error: &CatalogError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_error_class() {
        assert_eq!(CatalogError::not_found("Product", 1).status_code(), 404);
        assert_eq!(CatalogError::validation("page must be >= 1").status_code(), 400);
        assert_eq!(CatalogError::Conflict("category name taken".into()).status_code(), 409);
        assert_eq!(CatalogError::Database("connection reset".into()).status_code(), 500);
        assert_eq!(CatalogError::Cache("undecodable entry".into()).status_code(), 500);
        assert_eq!(CatalogError::internal("oops").status_code(), 500);
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(CatalogError::not_found("Product", 1).error_code(), "NOT_FOUND");
        assert_eq!(CatalogError::validation("x").error_code(), "VALIDATION_ERROR");
        assert_eq!(
            CatalogError::Configuration("no redis url".into()).error_code(),
            "CONFIGURATION_ERROR"
        );
        assert_eq!(CatalogError::Cache("x".into()).error_code(), "CACHE_ERROR");
        assert_eq!(
            CatalogError::Other(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_only_input_errors_are_client_errors() {
        assert!(CatalogError::not_found("Product", 1).is_client_error());
        assert!(CatalogError::validation("bad").is_client_error());
        assert!(!CatalogError::Database("down".into()).is_client_error());
        assert!(!CatalogError::Cache("bad json".into()).is_client_error());
    }

    #[test]
    fn test_not_found_names_the_product() {
        let message = CatalogError::not_found("Product", "123").to_string();
        assert_eq!(message, "Product 123 not found");
    }

    #[test]
    fn test_envelope_carries_code_and_message() {
        let response = ErrorResponse::from(&CatalogError::not_found("Product", 1));
        assert_eq!(response.code, "NOT_FOUND");
        assert_eq!(response.message, "Product 1 not found");
        assert!(response.details.is_none());

        let rejected = ErrorResponse::from(&CatalogError::validation("bad input")).with_details(vec![
            FieldError {
                field: "price".into(),
                message: "at most 2 decimal places".into(),
                code: "price_scale".into(),
            },
        ]);
        let json = serde_json::to_value(&rejected).unwrap();
        assert_eq!(json["details"][0]["field"], "price");
    }
}
