//! PostgreSQL product repository implementation.

use crate::{DatabasePoolInterface, ProductFilter, ProductRepository};
use catalog_core::{
    CatalogError, CatalogResult, CategoryId, Page, PageRequest, Price, Product,
    ProductDraft, ProductId,
};
use async_trait::async_trait;
use rust_decimal::Decimal;
use shaku::Component;
use sqlx::{FromRow, PgConnection};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const PRODUCT_COLUMNS: &str =
    "p.id, p.name, p.category_id, p.price, p.stock, p.description";

/// PostgreSQL product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct PgProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgProductRepository {
    /// Creates a new PostgreSQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a product.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    category_id: Uuid,
    price: Decimal,
    stock: i32,
    description: String,
}

impl TryFrom<ProductRow> for Product {
    type Error = CatalogError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price)
            .map_err(|e| CatalogError::Internal(format!("Invalid price in database: {}", e)))?;
        let stock = u32::try_from(row.stock)
            .map_err(|e| CatalogError::Internal(format!("Invalid stock in database: {}", e)))?;

        Ok(Product {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            category_id: CategoryId::from_uuid(row.category_id),
            price,
            stock,
            description: row.description,
        })
    }
}

fn stock_param(stock: u32) -> CatalogResult<i32> {
    i32::try_from(stock).map_err(|_| CatalogError::validation("stock: out of range"))
}

/// Returns the id of the category named `name`, inserting it if missing.
///
/// `ON CONFLICT DO NOTHING` keeps concurrent creators from failing on the
/// unique constraint; the follow-up select sees whichever row won.
async fn get_or_create_category(conn: &mut PgConnection, name: &str) -> CatalogResult<CategoryId> {
    sqlx::query("INSERT INTO categories (id, name) VALUES ($1, $2) ON CONFLICT (name) DO NOTHING")
        .bind(CategoryId::new().into_inner())
        .bind(name)
        .execute(&mut *conn)
        .await?;

    let id: Uuid = sqlx::query_scalar("SELECT id FROM categories WHERE name = $1")
        .bind(name)
        .fetch_one(&mut *conn)
        .await?;

    Ok(CategoryId::from_uuid(id))
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_by_id(&self, id: ProductId) -> CatalogResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products p WHERE p.id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(Product::try_from).transpose()
    }

    async fn find_page(
        &self,
        filter: ProductFilter,
        page: PageRequest,
    ) -> CatalogResult<Page<Product>> {
        debug!(
            "Finding products page={} size={} category={:?}",
            page.page, page.size, filter.category
        );

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE ($1::text IS NULL OR c.name = $1)
            "#,
        )
        .bind(filter.category.as_deref())
        .fetch_one(self.pool.inner())
        .await?;

        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            JOIN categories c ON c.id = p.category_id
            WHERE ($1::text IS NULL OR c.name = $1)
            ORDER BY p.name, p.id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.inner())
        .await?;

        let products = rows
            .into_iter()
            .map(Product::try_from)
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Page::new(products, page, u64::try_from(count).unwrap_or(0)))
    }

    async fn create(&self, draft: ProductDraft) -> CatalogResult<Product> {
        debug!("Creating product: {}", draft.name);

        let stock = stock_param(draft.stock)?;
        let mut tx = self.pool.inner().begin().await?;

        let category_id = get_or_create_category(&mut tx, &draft.category).await?;
        let product = Product::from_draft(ProductId::new(), category_id, draft);

        sqlx::query(
            r#"
            INSERT INTO products (id, name, category_id, price, stock, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(product.id.into_inner())
        .bind(&product.name)
        .bind(product.category_id.into_inner())
        .bind(product.price.amount())
        .bind(stock)
        .bind(&product.description)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(product)
    }

    async fn update(&self, id: ProductId, draft: ProductDraft) -> CatalogResult<Option<Product>> {
        debug!("Updating product: {}", id);

        let stock = stock_param(draft.stock)?;
        let mut tx = self.pool.inner().begin().await?;

        let category_id = get_or_create_category(&mut tx, &draft.category).await?;

        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            UPDATE products
            SET name = $2, category_id = $3, price = $4, stock = $5, description = $6
            WHERE id = $1
            RETURNING id, name, category_id, price, stock, description
            "#,
        )
        .bind(id.into_inner())
        .bind(&draft.name)
        .bind(category_id.into_inner())
        .bind(draft.price.amount())
        .bind(stock)
        .bind(&draft.description)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            // Dropping the transaction rolls back the category insert too.
            return Ok(None);
        };

        let product = Product::try_from(row)?;
        tx.commit().await?;
        Ok(Some(product))
    }

    async fn delete(&self, id: ProductId) -> CatalogResult<bool> {
        debug!("Deleting product: {}", id);

        let mut tx = self.pool.inner().begin().await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
