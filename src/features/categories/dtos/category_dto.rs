use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;

/// Request DTO for creating or updating a category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInputDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

/// Response DTO for a category with its product count
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponseDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub product_count: i64,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            product_count: c.product_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_keeps_product_count() {
        let dto = CategoryResponseDto::from(Category {
            id: 7,
            name: "Books".to_string(),
            description: None,
            product_count: 3,
        });

        assert_eq!(dto.id, 7);
        assert_eq!(dto.product_count, 3);
    }

    #[test]
    fn response_serializes_camel_case() {
        let dto = CategoryResponseDto::from(Category {
            id: 1,
            name: "Books".to_string(),
            description: Some("Print and digital books".to_string()),
            product_count: 0,
        });

        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["productCount"], 0);
        assert_eq!(json["name"], "Books");
    }

    #[test]
    fn input_rejects_empty_and_oversized_name() {
        let empty = CategoryInputDto {
            name: String::new(),
            description: None,
        };
        assert!(empty.validate().is_err());

        let oversized = CategoryInputDto {
            name: "x".repeat(101),
            description: None,
        };
        assert!(oversized.validate().is_err());

        let ok = CategoryInputDto {
            name: "Electronics".to_string(),
            description: Some("Devices".to_string()),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn input_rejects_oversized_description() {
        let dto = CategoryInputDto {
            name: "Electronics".to_string(),
            description: Some("d".repeat(501)),
        };
        assert!(dto.validate().is_err());
    }
}
