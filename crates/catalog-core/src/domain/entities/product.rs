//! Product entity.

use crate::validation::rules;
use crate::{CategoryId, Price, ProductId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Product entity as stored in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Owning category.
    pub category_id: CategoryId,
    /// Unit price.
    pub price: Price,
    /// Units in stock.
    pub stock: u32,
    /// Free-form description, may be empty.
    pub description: String,
}

impl Product {
    /// Maximum length of a product name.
    pub const MAX_NAME_LEN: usize = 200;
    /// Maximum length of a description.
    pub const MAX_DESCRIPTION_LEN: usize = 10_000;

    /// Builds a product from a draft, placed in `category_id`.
    #[must_use]
    pub fn from_draft(id: ProductId, category_id: CategoryId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            category_id,
            price: draft.price,
            stock: draft.stock,
            description: draft.description,
        }
    }
}

/// Field values for creating or fully replacing a product.
///
/// The category is referenced by name and created on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ProductDraft {
    /// Display name.
    #[validate(
        length(min = 1, max = 200),
        custom(function = "rules::not_blank")
    )]
    pub name: String,

    /// Category name.
    #[validate(
        length(min = 1, max = 100),
        custom(function = "rules::category_name")
    )]
    pub category: String,

    /// Unit price, at most two decimal places.
    #[cfg_attr(feature = "openapi", schema(value_type = f64, example = 19.99))]
    pub price: Price,

    /// Units in stock.
    #[validate(range(max = 2_147_483_647))]
    pub stock: u32,

    /// Free-form description.
    #[serde(default)]
    #[validate(length(max = 10_000))]
    pub description: String,
}
