use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::admin::{Page, Pagination, SmartEnergyAdmin};
use crate::error::AdminError;

/// Path used for create, update, and delete.
pub const NOTIFICATION_PATH: &str = "notification";
const NOTIFICATIONS_PATH: &str = "notifications";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Notification {
    pub id: String,
    pub title_uz: String,
    pub title_ru: String,
    pub description_uz: String,
    pub description_ru: String,
    pub created_at: Option<String>,
    pub deleted_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotificationForm {
    pub title_uz: String,
    pub description_uz: String,
    pub title_ru: String,
    pub description_ru: String,
}

impl SmartEnergyAdmin {
    pub async fn list_notifications(
        &self,
        pagination: Pagination,
    ) -> Result<Page<Notification>, AdminError> {
        self.fetch_page(NOTIFICATIONS_PATH, "notifications", &pagination.query())
            .await
    }

    pub async fn create_notification(&self, form: &NotificationForm) -> Result<Value, AdminError> {
        self.post_json(NOTIFICATION_PATH, form).await
    }

    pub async fn update_notification(
        &self,
        id: &str,
        form: &NotificationForm,
    ) -> Result<Value, AdminError> {
        self.put_with_body_id(NOTIFICATION_PATH, id, form).await
    }

    pub async fn delete_notification(&self, id: &str) -> Result<(), AdminError> {
        self.delete(NOTIFICATION_PATH, id).await
    }
}
