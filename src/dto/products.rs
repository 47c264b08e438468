use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub slug: String,
    pub category_id: Uuid,
    pub description: Option<String>,
    pub price: i64,
    pub in_sale: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub in_sale: Option<bool>,
}

/// One "name = value" pair for a product property.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PropertyValueRequest {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SetPropertiesRequest {
    #[schema(value_type = Vec<PropertyValueRequest>)]
    pub properties: Vec<PropertyValueRequest>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}
