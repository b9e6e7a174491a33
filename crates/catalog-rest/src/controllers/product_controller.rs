//! Product catalog controller.

use crate::{
    extractors::{ProductIdPath, ValidatedJson},
    responses::{cached, created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use catalog_core::ProductDraft;
use catalog_service::{ListingQuery, ListingResult, ProductRecord};
use tracing::debug;

/// Creates the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products, one page at a time.
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListingQuery),
    responses(
        (status = 200, description = "One page of products", body = ApiResponse<ListingResult>),
        (status = 400, description = "Invalid paging or price parameters")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> ApiResult<ListingResult> {
    debug!("List products request: {:?}", query);

    let listing = state.product_service.list_products(query).await?;
    cached(listing)
}

/// Get a product by ID.
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 200, description = "The product", body = ApiResponse<ProductRecord>),
        (status = 400, description = "Malformed product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> ApiResult<ProductRecord> {
    debug!("Get product request: {}", id);

    let product = state.product_service.get_product(id).await?;
    cached(product)
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = ProductDraft,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductRecord>),
        (status = 400, description = "Invalid product")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(draft): ValidatedJson<ProductDraft>,
) -> Result<(StatusCode, Json<ApiResponse<ProductRecord>>), AppError> {
    debug!("Create product request: {}", draft.name);

    let product = state.product_service.create_product(draft).await?;
    Ok(created(product))
}

/// Replace every field of a product.
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    request_body = ProductDraft,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductRecord>),
        (status = 400, description = "Invalid product or product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
    ValidatedJson(draft): ValidatedJson<ProductDraft>,
) -> ApiResult<ProductRecord> {
    debug!("Update product request: {}", id);

    let product = state.product_service.update_product(id, draft).await?;
    ok(product)
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = String, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Malformed product ID"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    ProductIdPath(id): ProductIdPath,
) -> Result<StatusCode, AppError> {
    debug!("Delete product request: {}", id);

    state.product_service.delete_product(id).await?;
    Ok(no_content())
}
