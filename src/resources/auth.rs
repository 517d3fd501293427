use log::info;
use serde::Deserialize;
use serde_json::{json, Value};
use session_store::Session;

use crate::admin::SmartEnergyAdmin;
use crate::error::AdminError;

/// Admin account as returned by the login endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AdminUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub image_url: Option<String>,
    pub language: Option<String>,
    pub created_at: Option<String>,
}

impl AdminUser {
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    admin: Option<AdminUser>,
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl SmartEnergyAdmin {
    /// `POST admin-login`; stores the returned tokens and admin id.
    pub async fn login(&self, email: &str, password: &str) -> Result<AdminUser, AdminError> {
        let response: LoginResponse = self
            .post_json("admin-login", &json!({ "email": email, "password": password }))
            .await?;
        self.start_session(response)
    }

    /// `POST admin-register`; asks the backend to email a one-time code.
    pub async fn request_code(&self, email: &str) -> Result<(), AdminError> {
        self.post_json::<Value>("admin-register", &json!({ "email": email }))
            .await?;
        info!("verification code requested");
        Ok(())
    }

    /// `POST admin-verify`; signs in with the emailed code.
    pub async fn verify(&self, email: &str, code: u32) -> Result<AdminUser, AdminError> {
        let response: LoginResponse = self
            .post_json("admin-verify", &json!({ "code": code, "email": email }))
            .await?;
        self.start_session(response)
    }

    /// Forget the stored session. Nothing is sent to the backend.
    pub fn logout(&self) -> Result<(), AdminError> {
        self.session().clear()?;
        info!("signed out");
        Ok(())
    }

    /// Id of the signed-in admin, or [`AdminError::NotAuthenticated`].
    pub fn require_admin(&self) -> Result<String, AdminError> {
        self.session()
            .user_id()?
            .ok_or(AdminError::NotAuthenticated)
    }

    fn start_session(&self, response: LoginResponse) -> Result<AdminUser, AdminError> {
        let access_token = non_empty(response.access_token)
            .ok_or(AdminError::IncompleteLogin("an access token"))?;
        let admin = response
            .admin
            .filter(|admin| !admin.id.trim().is_empty())
            .ok_or(AdminError::IncompleteLogin("the admin account"))?;

        let session = Session::new(
            access_token,
            non_empty(response.refresh_token),
            Some(admin.id.clone()),
        )?;
        self.session().save(&session)?;
        info!("signed in as admin {}", admin.id);
        Ok(admin)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
