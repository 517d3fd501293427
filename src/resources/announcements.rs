use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::SmartEnergyAdmin;
use crate::error::AdminError;
use crate::format::format_price;

/// Which storefront banner an announcement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementKind {
    Product,
    Service,
}

impl AnnouncementKind {
    pub fn path(self) -> &'static str {
        match self {
            Self::Product => "product-announcement",
            Self::Service => "service-announcement",
        }
    }
}

impl fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Product => write!(f, "product"),
            Self::Service => write!(f, "service"),
        }
    }
}

impl FromStr for AnnouncementKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(Self::Product),
            "service" => Ok(Self::Service),
            other => Err(format!("unknown announcement kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name_uz: String,
    pub name_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Announcement {
    pub fn formatted_price(&self) -> String {
        format_price(self.price)
    }
}

impl SmartEnergyAdmin {
    /// Current announcement; `None` when the backend has none yet.
    pub async fn get_announcement(
        &self,
        kind: AnnouncementKind,
    ) -> Result<Option<Announcement>, AdminError> {
        Ok(self
            .client()
            .get::<Option<Announcement>>(kind.path(), &[])
            .await?
            .into_data())
    }

    pub async fn publish_announcement(
        &self,
        kind: AnnouncementKind,
        announcement: &Announcement,
    ) -> Result<Value, AdminError> {
        self.post_json(kind.path(), announcement).await
    }
}
