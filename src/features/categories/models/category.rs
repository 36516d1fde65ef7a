use sqlx::FromRow;

/// Database model for a category, carrying the aggregated product count.
///
/// Every read selects the count alongside the row, so the model always
/// reflects how many products currently reference the category.
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
}
