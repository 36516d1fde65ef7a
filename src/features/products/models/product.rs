use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for a product, joined with its category name.
///
/// `category_name` comes from an explicit LEFT JOIN on categories; a
/// missing relation surfaces as `None` and is mapped to a placeholder
/// at the DTO boundary.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub category_id: i32,
    pub category_name: Option<String>,
}
