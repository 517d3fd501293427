use serde::Serialize;
use serde_json::Value;

use crate::admin::SmartEnergyAdmin;
use crate::error::AdminError;

/// Fields accepted by `POST admin` and `PUT admin`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AdminForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub language: String,
}

impl SmartEnergyAdmin {
    pub async fn create_admin(&self, form: &AdminForm) -> Result<Value, AdminError> {
        self.post_json("admin", form).await
    }

    /// The backend takes the admin id from the body.
    pub async fn update_admin(&self, id: &str, form: &AdminForm) -> Result<Value, AdminError> {
        self.put_with_body_id("admin", id, form).await
    }
}
