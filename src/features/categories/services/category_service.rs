use sqlx::{Error as SqlxError, PgPool};

use crate::core::error::{AppError, Result, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION};
use crate::features::categories::dtos::{CategoryInputDto, CategoryResponseDto};
use crate::features::categories::models::Category;
use crate::features::products::dtos::ProductResponseDto;
use crate::features::products::models::Product;

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all categories ordered by name, each with its product count
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.description,
                   (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
            FROM categories c
            ORDER BY c.name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list categories: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Get one category with its product count
    pub async fn get(&self, id: i32) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.description,
                   (SELECT COUNT(*) FROM products p WHERE p.category_id = c.id) AS product_count
            FROM categories c
            WHERE c.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category.into())
    }

    /// All products referencing the category, ordered by product name
    pub async fn list_products(&self, id: i32) -> Result<Vec<ProductResponseDto>> {
        self.ensure_exists(id).await?;

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.stock, p.is_active,
                   p.created_at, p.updated_at, p.category_id, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.category_id = $1
            ORDER BY p.name ASC
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list products for category {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    /// Create a category; the name must not already be taken
    pub async fn create(&self, dto: CategoryInputDto) -> Result<CategoryResponseDto> {
        let name_taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1)")
                .bind(&dto.name)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if name_taken {
            return Err(AppError::Conflict(format!(
                "Category '{}' already exists",
                dto.name
            )));
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, 0::BIGINT AS product_count
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Category '{}' already exists", dto.name)))?;

        tracing::info!("Category created: id={}, name={}", category.id, category.name);

        Ok(category.into())
    }

    /// Overwrite name and description in place.
    ///
    /// Name uniqueness is not re-checked here; the unique index still
    /// rejects an exact collision at the store level.
    pub async fn update(&self, id: i32, dto: CategoryInputDto) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, description = $2
            WHERE id = $3
            RETURNING id, name, description,
                      (SELECT COUNT(*) FROM products p WHERE p.category_id = categories.id) AS product_count
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Category '{}' already exists", dto.name)))?
        .ok_or_else(|| AppError::NotFound(format!("Category {} not found", id)))?;

        Ok(category.into())
    }

    /// Delete a category; blocked while any product references it
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.ensure_exists(id).await?;

        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if product_count > 0 {
            return Err(AppError::Conflict(
                "Cannot delete a category that still has products".to_string(),
            ));
        }

        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_fk_violation(
                    e,
                    "Cannot delete a category that still has products".to_string(),
                )
            })?;

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Category {} not found", id)))
        }
    }
}

/// Translate a store-surfaced unique violation into the Conflict the name
/// pre-check would have produced; the pre-check alone is not race-free.
fn map_unique_violation(err: SqlxError, message: String) -> AppError {
    match err {
        SqlxError::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            AppError::Conflict(message)
        }
        other => AppError::Database(other),
    }
}

/// Translate a store-surfaced FK restriction into the Conflict the
/// product-count pre-check would have produced.
fn map_fk_violation(err: SqlxError, message: String) -> AppError {
    match err {
        SqlxError::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            AppError::Conflict(message)
        }
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrelated_errors_pass_through_unique_mapping() {
        let mapped = map_unique_violation(SqlxError::PoolTimedOut, "taken".to_string());
        assert!(matches!(mapped, AppError::Database(_)));
    }

    #[test]
    fn unrelated_errors_pass_through_fk_mapping() {
        let mapped = map_fk_violation(SqlxError::RowNotFound, "blocked".to_string());
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
