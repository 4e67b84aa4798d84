//! Product repository.
//!
//! Partial updates bind `NULL` for absent fields and resolve them with
//! `COALESCE`, so an explicit zero (discount cleared, stock emptied) is
//! applied rather than silently dropped.
//!
//! Concurrent updates to the same product are last-write-wins per field;
//! there is no optimistic-concurrency token.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use loomline_core::{DiscountPercent, ProductId, ProductStatus};

use super::RepositoryError;
use crate::models::product::{NewProduct, Product, ProductPatch};

/// Raw row shape; converted to [`Product`] with domain validation.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    discount: i32,
    category: String,
    images: Vec<String>,
    colors: Vec<String>,
    sizes: Vec<String>,
    stock: i32,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let discount = DiscountPercent::new(row.discount).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid discount in database: {e}"))
        })?;
        let status: ProductStatus = row.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            discount,
            category: row.category,
            images: row.images,
            colors: row.colors,
            sizes: row.sizes,
            stock: row.stock,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price, discount, category, \
     images, colors, sizes, stock, status, created_at, updated_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Get a single product.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Insert a new product.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products \
             (name, description, price, discount, category, images, colors, sizes, stock, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.discount.as_i32())
        .bind(&input.category)
        .bind(&input.images)
        .bind(&input.colors)
        .bind(&input.sizes)
        .bind(input.stock)
        .bind(input.status.to_string())
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Apply a partial update; only bound (non-NULL) fields change.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               price = COALESCE($4, price), \
               discount = COALESCE($5, discount), \
               category = COALESCE($6, category), \
               images = COALESCE($7, images), \
               colors = COALESCE($8, colors), \
               sizes = COALESCE($9, sizes), \
               stock = COALESCE($10, stock), \
               status = COALESCE($11, status), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .bind(patch.name.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.price)
        .bind(patch.discount.map(DiscountPercent::as_i32))
        .bind(patch.category.as_deref())
        .bind(patch.images.as_deref())
        .bind(patch.colors.as_deref())
        .bind(patch.sizes.as_deref())
        .bind(patch.stock)
        .bind(patch.status.map(|s| s.to_string()))
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => r.try_into(),
            None => Err(RepositoryError::NotFound),
        }
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
