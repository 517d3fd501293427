use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{Page, Pagination, SmartEnergyAdmin};
use crate::error::AdminError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Product,
    Service,
}

impl CategoryKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::Product => "product-categories",
            Self::Service => "service-categories",
        }
    }

    /// Field the listing response keeps its items under.
    fn items_key(self) -> &'static str {
        match self {
            Self::Product => "product_categories",
            Self::Service => "service_categories",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
            Self::Service => write!(f, "service"),
        }
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "product" | "products" => Ok(Self::Product),
            "service" | "services" => Ok(Self::Service),
            other => Err(format!("unknown category kind '{other}'")),
        }
    }
}

/// Product or service category. Only service categories carry an icon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name_uz: String,
    pub name_ru: String,
    pub icon_name: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryForm {
    pub name_uz: String,
    pub name_ru: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
}

impl SmartEnergyAdmin {
    /// Both category endpoints answer with their own item key; the result is
    /// the same [`Page`] either way.
    pub async fn list_categories(
        &self,
        kind: CategoryKind,
        pagination: Pagination,
        search: Option<&str>,
    ) -> Result<Page<Category>, AdminError> {
        let mut query = pagination.query();
        if let Some(search) = search.map(str::trim).filter(|search| !search.is_empty()) {
            query.push(("search", search.to_string()));
        }
        self.fetch_page(kind.path(), kind.items_key(), &query).await
    }

    pub async fn create_category(
        &self,
        kind: CategoryKind,
        form: &CategoryForm,
    ) -> Result<Value, AdminError> {
        self.post_json(kind.path(), form).await
    }

    pub async fn update_category(
        &self,
        kind: CategoryKind,
        id: &str,
        form: &CategoryForm,
    ) -> Result<Value, AdminError> {
        self.put_with_body_id(kind.path(), id, form).await
    }

    pub async fn delete_category(&self, kind: CategoryKind, id: &str) -> Result<(), AdminError> {
        self.delete(kind.path(), id).await
    }
}
