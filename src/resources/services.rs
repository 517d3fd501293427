use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{Page, Pagination, SmartEnergyAdmin};
use crate::error::AdminError;
use crate::format::format_price;

pub const SERVICES_PATH: &str = "services";

/// Installation or maintenance offering.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Service {
    pub id: String,
    pub name_uz: String,
    pub name_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    pub price: Value,
    pub category_id: String,
    pub created_at: Option<String>,
}

impl Service {
    pub fn formatted_price(&self) -> String {
        format_price(&self.price)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceForm {
    pub name_uz: String,
    pub name_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    pub price: f64,
    pub category_id: String,
}

impl SmartEnergyAdmin {
    pub async fn list_services(&self, pagination: Pagination) -> Result<Page<Service>, AdminError> {
        self.fetch_page(SERVICES_PATH, "services", &pagination.query())
            .await
    }

    pub async fn create_service(&self, form: &ServiceForm) -> Result<Value, AdminError> {
        self.post_json(SERVICES_PATH, form).await
    }

    pub async fn update_service(&self, id: &str, form: &ServiceForm) -> Result<Value, AdminError> {
        self.put_with_body_id(SERVICES_PATH, id, form).await
    }

    pub async fn delete_service(&self, id: &str) -> Result<(), AdminError> {
        self.delete(SERVICES_PATH, id).await
    }
}
