use sqlx::{Error as SqlxError, PgPool};

use crate::core::error::{AppError, Result, FOREIGN_KEY_VIOLATION};
use crate::features::products::dtos::{
    CreateProductDto, ProductQueryParams, ProductResponseDto, UpdateProductDto,
};
use crate::features::products::models::Product;

/// Service for product operations
pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List products with filters, sort, and pagination.
    ///
    /// Filters compose with AND; the total is counted over the same
    /// predicates before LIMIT/OFFSET apply. Returns the page plus the
    /// total matching count.
    pub async fn list(&self, params: &ProductQueryParams) -> Result<(Vec<ProductResponseDto>, i64)> {
        let mut conditions: Vec<String> = Vec::new();
        let mut next_param = 1usize;

        if params.category_id.is_some() {
            conditions.push(format!("p.category_id = ${next_param}"));
            next_param += 1;
        }
        if params.is_active.is_some() {
            conditions.push(format!("p.is_active = ${next_param}"));
            next_param += 1;
        }
        let search_pattern = params.search_term().map(|s| format!("%{}%", s));
        if search_pattern.is_some() {
            // A NULL description never matches
            conditions.push(format!(
                "(p.name ILIKE ${next_param} OR p.description ILIKE ${next_param})"
            ));
            next_param += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let count_sql = format!("SELECT COUNT(*) FROM products p {}", where_clause);
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(category_id) = params.category_id {
            count_query = count_query.bind(category_id);
        }
        if let Some(is_active) = params.is_active {
            count_query = count_query.bind(is_active);
        }
        if let Some(ref pattern) = search_pattern {
            count_query = count_query.bind(pattern.clone());
        }
        let total = count_query.fetch_one(&self.pool).await.map_err(|e| {
            tracing::error!("Failed to count products: {:?}", e);
            AppError::Database(e)
        })?;

        let list_sql = format!(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.stock, p.is_active,
                   p.created_at, p.updated_at, p.category_id, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            {}
            ORDER BY {}
            LIMIT ${} OFFSET ${}
            "#,
            where_clause,
            params.sort_key().as_order_sql(),
            next_param,
            next_param + 1
        );

        let mut list_query = sqlx::query_as::<_, Product>(&list_sql);
        if let Some(category_id) = params.category_id {
            list_query = list_query.bind(category_id);
        }
        if let Some(is_active) = params.is_active {
            list_query = list_query.bind(is_active);
        }
        if let Some(ref pattern) = search_pattern {
            list_query = list_query.bind(pattern.clone());
        }
        let products = list_query
            .bind(params.limit())
            .bind(params.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list products: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((products.into_iter().map(Into::into).collect(), total))
    }

    /// Get one product with its category name
    pub async fn get(&self, id: i32) -> Result<ProductResponseDto> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT p.id, p.name, p.description, p.price, p.stock, p.is_active,
                   p.created_at, p.updated_at, p.category_id, c.name AS category_name
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::Database)?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        Ok(product.into())
    }

    /// Create a product; the category must exist
    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        self.ensure_category_exists(dto.category_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, description, price, stock, is_active, created_at, category_id)
            VALUES ($1, $2, $3, $4, TRUE, NOW(), $5)
            RETURNING id, name, description, price, stock, is_active, created_at, updated_at, category_id,
                      (SELECT c.name FROM categories c WHERE c.id = products.category_id) AS category_name
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.stock)
        .bind(dto.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_category_fk_violation(e, dto.category_id))?;

        tracing::info!("Product created: id={}, name={}", product.id, product.name);

        Ok(product.into())
    }

    /// Overwrite every mutable field and stamp `updated_at`
    pub async fn update(&self, id: i32, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        self.ensure_exists(id).await?;
        self.ensure_category_exists(dto.category_id).await?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, description = $2, price = $3, stock = $4, is_active = $5,
                category_id = $6, updated_at = NOW()
            WHERE id = $7
            RETURNING id, name, description, price, stock, is_active, created_at, updated_at, category_id,
                      (SELECT c.name FROM categories c WHERE c.id = products.category_id) AS category_name
            "#,
        )
        .bind(&dto.name)
        .bind(&dto.description)
        .bind(dto.price)
        .bind(dto.stock)
        .bind(dto.is_active)
        .bind(dto.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_category_fk_violation(e, dto.category_id))?
        .ok_or_else(|| AppError::NotFound(format!("Product {} not found", id)))?;

        Ok(product.into())
    }

    /// Delete a product unconditionally
    pub async fn delete(&self, id: i32) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Product {} not found", id)));
        }

        tracing::info!("Product deleted: id={}", id);

        Ok(())
    }

    async fn ensure_exists(&self, id: i32) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Product {} not found", id)))
        }
    }

    async fn ensure_category_exists(&self, category_id: i32) -> Result<()> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1)")
                .bind(category_id)
                .fetch_one(&self.pool)
                .await
                .map_err(AppError::Database)?;

        if exists {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Category {} not found",
                category_id
            )))
        }
    }
}

/// Backstop for the category pre-check: a concurrent category delete can
/// still surface as a foreign-key violation at write time.
fn map_category_fk_violation(err: SqlxError, category_id: i32) -> AppError {
    match err {
        SqlxError::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            AppError::BadRequest(format!("Category {} not found", category_id))
        }
        other => AppError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrelated_errors_pass_through_fk_mapping() {
        let mapped = map_category_fk_violation(SqlxError::PoolTimedOut, 9);
        assert!(matches!(mapped, AppError::Database(_)));
    }
}
