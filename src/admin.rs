use std::fmt::Display;
use std::sync::Arc;

use admin_api::{AdminApiClient, RequestOptions, SessionExpiryHandler};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use session_store::{FileSessionStore, SessionStorage};

use crate::config::Settings;
use crate::error::AdminError;

/// One page of a listing plus the backend's total count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: u64,
}

/// `page`/`limit` query pair; pages start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

/// Typed entry point to the admin backend.
///
/// Every call goes through the shared [`AdminApiClient`], so all resources
/// share one session and one refresh barrier.
#[derive(Clone)]
pub struct SmartEnergyAdmin {
    client: Arc<AdminApiClient>,
}

impl SmartEnergyAdmin {
    pub fn new(client: Arc<AdminApiClient>) -> Self {
        Self { client }
    }

    /// Build a client over the file-backed session at `settings.session_path`.
    pub fn connect(
        settings: &Settings,
        expiry: Arc<dyn SessionExpiryHandler>,
    ) -> Result<Self, AdminError> {
        let store = Arc::new(FileSessionStore::new(&settings.session_path));
        let client = AdminApiClient::new(settings.api_config(), store)?.with_expiry_handler(expiry);
        Ok(Self::new(Arc::new(client)))
    }

    pub fn client(&self) -> &Arc<AdminApiClient> {
        &self.client
    }

    pub fn session(&self) -> &Arc<dyn SessionStorage> {
        self.client.session()
    }

    /// `DELETE {path}/{id}`, as used by every delete confirmation.
    pub async fn delete(&self, path: &str, id: impl Display) -> Result<(), AdminError> {
        self.client
            .remove::<Value>(path, id, RequestOptions::default())
            .await?;
        Ok(())
    }

    /// GET a listing whose items sit under `key` next to a `count` field.
    pub(crate) async fn fetch_page<T: DeserializeOwned>(
        &self,
        path: &str,
        key: &str,
        query: &[(&str, String)],
    ) -> Result<Page<T>, AdminError> {
        let mut body = self
            .client
            .get::<Option<Map<String, Value>>>(path, query)
            .await?
            .into_data()
            .unwrap_or_default();

        let items: Vec<T> = match body.remove(key) {
            None | Some(Value::Null) => Vec::new(),
            Some(items) => serde_json::from_value(items)?,
        };
        let count = body
            .get("count")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64);

        debug!("{path}: {} of {count} items", items.len());
        Ok(Page { items, count })
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, AdminError> {
        let body = serde_json::to_value(body)?;
        Ok(self
            .client
            .post(path, Some(body), RequestOptions::default())
            .await?
            .into_data())
    }

    /// `PUT {path}` with the record id merged into the body.
    pub(crate) async fn put_with_body_id<T: DeserializeOwned>(
        &self,
        path: &str,
        id: &str,
        body: &impl Serialize,
    ) -> Result<T, AdminError> {
        let mut body = serde_json::to_value(body)?;
        if let Value::Object(fields) = &mut body {
            fields.insert("id".to_string(), Value::String(id.to_string()));
        }
        Ok(self
            .client
            .put_without_id(path, Some(body), RequestOptions::default())
            .await?
            .into_data())
    }
}
