use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{Page, Pagination, SmartEnergyAdmin};
use crate::error::AdminError;
use crate::format::format_price;

pub const PRODUCTS_PATH: &str = "products";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub name_uz: String,
    pub name_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    /// Number or numeric string, depending on the endpoint.
    pub price: Value,
    pub category_id: String,
    pub watt: Value,
    pub brand: String,
    pub model: String,
    pub images: Vec<String>,
    pub created_at: Option<String>,
}

impl Product {
    pub fn formatted_price(&self) -> String {
        format_price(&self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProductForm {
    pub name_uz: String,
    pub name_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    pub price: f64,
    pub category_id: String,
    pub watt: String,
    pub brand: String,
    pub model: String,
    pub images: Vec<String>,
}

impl SmartEnergyAdmin {
    pub async fn list_products(&self, pagination: Pagination) -> Result<Page<Product>, AdminError> {
        self.fetch_page(PRODUCTS_PATH, "products", &pagination.query())
            .await
    }

    pub async fn create_product(&self, form: &ProductForm) -> Result<Value, AdminError> {
        self.post_json(PRODUCTS_PATH, form).await
    }

    pub async fn update_product(&self, id: &str, form: &ProductForm) -> Result<Value, AdminError> {
        self.put_with_body_id(PRODUCTS_PATH, id, form).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), AdminError> {
        self.delete(PRODUCTS_PATH, id).await
    }
}
