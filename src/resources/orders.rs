use std::fmt;
use std::str::FromStr;

use admin_api::{Method, RequestSpec};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::admin::{Page, Pagination, SmartEnergyAdmin};
use crate::error::AdminError;
use crate::format::format_price;

pub const ORDERS_PATH: &str = "orders";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    New,
    Delivered,
    Success,
    Canceled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Delivered => "delivered",
            Self::Success => "success",
            Self::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "delivered" => Ok(Self::Delivered),
            "success" => Ok(Self::Success),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            other => Err(format!(
                "unknown order status '{other}' (expected new, delivered, success or canceled)"
            )),
        }
    }
}

/// Customer order. Fields the client does not model are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Order {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub total_price: Value,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Order {
    pub fn formatted_total(&self) -> String {
        format_price(&self.total_price)
    }
}

/// Order payload; the backend owns the schema, so fields pass through as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderForm {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SmartEnergyAdmin {
    pub async fn list_orders(&self, pagination: Pagination) -> Result<Page<Order>, AdminError> {
        self.fetch_page(ORDERS_PATH, "orders", &pagination.query())
            .await
    }

    pub async fn create_order(&self, form: &OrderForm) -> Result<Value, AdminError> {
        self.post_json(ORDERS_PATH, form).await
    }

    pub async fn update_order(&self, id: &str, form: &OrderForm) -> Result<Value, AdminError> {
        self.put_with_body_id(ORDERS_PATH, id, form).await
    }

    /// `PATCH orders/{id}` with `{status}`.
    pub async fn update_order_status(
        &self,
        id: &str,
        status: OrderStatus,
    ) -> Result<Value, AdminError> {
        let spec = RequestSpec::new(Method::PATCH, ORDERS_PATH)
            .with_id(id)
            .with_body(Some(json!({ "status": status })));
        Ok(self.client().execute(spec).await?.into_data())
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), AdminError> {
        self.delete(ORDERS_PATH, id).await
    }
}
