use std::borrow::Cow;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::features::products::models::Product;
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, UNRESOLVED_CATEGORY_NAME};

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

/// Sort keys accepted by the product listing.
///
/// Parsed leniently: anything unrecognized falls back to name ascending
/// instead of rejecting the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSortKey {
    Price,
    PriceDesc,
    Date,
    Stock,
    #[default]
    Name,
}

impl ProductSortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "price" => Self::Price,
            "price_desc" => Self::PriceDesc,
            "date" => Self::Date,
            "stock" => Self::Stock,
            _ => Self::Name,
        }
    }

    pub fn as_order_sql(&self) -> &'static str {
        match self {
            Self::Price => "p.price ASC",
            Self::PriceDesc => "p.price DESC",
            Self::Date => "p.created_at DESC",
            Self::Stock => "p.stock ASC",
            Self::Name => "p.name ASC",
        }
    }
}

/// Query params for the product listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQueryParams {
    /// Filter by owning category
    pub category_id: Option<i32>,

    /// Filter by active flag
    pub is_active: Option<bool>,

    /// Case-insensitive substring match on name or description
    pub search: Option<String>,

    /// Sort key: price, price_desc, date, stock (default: name)
    pub sort_by: Option<String>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

impl ProductQueryParams {
    pub fn sort_key(&self) -> ProductSortKey {
        self.sort_by
            .as_deref()
            .map(ProductSortKey::parse)
            .unwrap_or_default()
    }

    /// Non-empty search term, whitespace trimmed
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    let min = Decimal::new(1, 2); // 0.01
    let max = Decimal::new(99_999_999, 2); // 999999.99

    if *price < min || *price > max {
        return Err(ValidationError::new("range")
            .with_message(Cow::Borrowed("Price must be between 0.01 and 999999.99")));
    }

    Ok(())
}

/// Request DTO for creating a product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = validate_price))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,

    pub category_id: i32,
}

/// Request DTO for updating a product; every mutable field is overwritten
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductDto {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description must not exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(custom(function = validate_price))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock: i32,

    pub is_active: bool,

    pub category_id: i32,
}

/// Response DTO for a product with its resolved category name
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponseDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub category_id: i32,
    pub category_name: String,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock: p.stock,
            is_active: p.is_active,
            created_at: p.created_at,
            category_id: p.category_id,
            category_name: p
                .category_name
                .unwrap_or_else(|| UNRESOLVED_CATEGORY_NAME.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(sort_by: Option<&str>, page: i64, page_size: i64) -> ProductQueryParams {
        ProductQueryParams {
            category_id: None,
            is_active: None,
            search: None,
            sort_by: sort_by.map(str::to_string),
            page,
            page_size,
        }
    }

    fn product(category_name: Option<&str>) -> Product {
        Product {
            id: 1,
            name: "Novel".to_string(),
            description: None,
            price: Decimal::new(999, 2),
            stock: 3,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
            category_id: 2,
            category_name: category_name.map(str::to_string),
        }
    }

    #[test]
    fn sort_key_parses_known_values() {
        assert_eq!(ProductSortKey::parse("price"), ProductSortKey::Price);
        assert_eq!(ProductSortKey::parse("price_desc"), ProductSortKey::PriceDesc);
        assert_eq!(ProductSortKey::parse("date"), ProductSortKey::Date);
        assert_eq!(ProductSortKey::parse("stock"), ProductSortKey::Stock);
        assert_eq!(ProductSortKey::parse("PRICE"), ProductSortKey::Price);
    }

    #[test]
    fn sort_key_falls_back_to_name() {
        assert_eq!(ProductSortKey::parse("unknown"), ProductSortKey::Name);
        assert_eq!(ProductSortKey::parse(""), ProductSortKey::Name);
        assert_eq!(params(None, 1, 10).sort_key(), ProductSortKey::Name);
    }

    #[test]
    fn order_sql_matches_direction() {
        assert_eq!(ProductSortKey::Price.as_order_sql(), "p.price ASC");
        assert_eq!(ProductSortKey::PriceDesc.as_order_sql(), "p.price DESC");
        assert_eq!(ProductSortKey::Date.as_order_sql(), "p.created_at DESC");
    }

    #[test]
    fn pagination_math() {
        let p = params(None, 2, 2);
        assert_eq!(p.offset(), 2);
        assert_eq!(p.limit(), 2);

        // Page floor and size clamp
        let p = params(None, 0, 500);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
    }

    #[test]
    fn search_term_trims_and_drops_blank() {
        let mut p = params(None, 1, 10);
        p.search = Some("  foo ".to_string());
        assert_eq!(p.search_term(), Some("foo"));

        p.search = Some("   ".to_string());
        assert_eq!(p.search_term(), None);
    }

    #[test]
    fn price_bounds_are_inclusive() {
        let mut dto = CreateProductDto {
            name: "Novel".to_string(),
            description: None,
            price: Decimal::new(1, 2),
            stock: 0,
            category_id: 1,
        };
        assert!(dto.validate().is_ok());

        dto.price = Decimal::new(99_999_999, 2);
        assert!(dto.validate().is_ok());

        dto.price = Decimal::ZERO;
        assert!(dto.validate().is_err());

        dto.price = Decimal::new(100_000_000, 2);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn negative_stock_rejected() {
        let dto = CreateProductDto {
            name: "Novel".to_string(),
            description: None,
            price: Decimal::new(999, 2),
            stock: -1,
            category_id: 1,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn missing_category_name_maps_to_placeholder() {
        let dto = ProductResponseDto::from(product(None));
        assert_eq!(dto.category_name, UNRESOLVED_CATEGORY_NAME);

        let dto = ProductResponseDto::from(product(Some("Books")));
        assert_eq!(dto.category_name, "Books");
    }

    #[test]
    fn response_serializes_camel_case_without_updated_at() {
        let json = serde_json::to_value(ProductResponseDto::from(product(Some("Books")))).unwrap();
        assert_eq!(json["categoryName"], "Books");
        assert_eq!(json["isActive"], true);
        assert!(json.get("updatedAt").is_none());
    }
}
