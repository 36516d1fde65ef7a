use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as category_dtos, handlers as category_handlers};
use crate::features::products::{dtos as product_dtos, handlers as product_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories
        category_handlers::list_categories,
        category_handlers::get_category,
        category_handlers::list_category_products,
        category_handlers::create_category,
        category_handlers::update_category,
        category_handlers::delete_category,
        // Products
        product_handlers::list_products,
        product_handlers::get_product,
        product_handlers::create_product,
        product_handlers::update_product,
        product_handlers::delete_product,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            category_dtos::CategoryInputDto,
            category_dtos::CategoryResponseDto,
            ApiResponse<Vec<category_dtos::CategoryResponseDto>>,
            ApiResponse<category_dtos::CategoryResponseDto>,
            // Products
            product_dtos::CreateProductDto,
            product_dtos::UpdateProductDto,
            product_dtos::ProductResponseDto,
            ApiResponse<Vec<product_dtos::ProductResponseDto>>,
            ApiResponse<product_dtos::ProductResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Category catalog management"),
        (name = "products", description = "Product catalog management"),
    ),
    info(
        title = "Catalog API",
        version = "0.1.0",
        description = "REST API for the product catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
