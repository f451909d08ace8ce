//! Firebase Realtime Database driver (REST API)

use super::ensure_success;
use crate::config::{ACCESS_TOKEN, DATABASE_URL};
use crate::core::{FirekitError, FirekitResult};
use crate::di::traits::{ConfigProvider, DatabaseDriver};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Database driver that forwards to the Realtime Database REST API
///
/// Each document path maps to `{database_url}/{path}.json`.
pub struct RealtimeDatabaseDriver {
    client: Client,
    base_url: String,
    access_token: Option<String>,
}

impl RealtimeDatabaseDriver {
    /// Create a driver from configuration; requires `FIREBASE_DATABASE_URL`
    pub fn from_config(config: &dyn ConfigProvider) -> FirekitResult<Self> {
        let base_url = config
            .get_or_throw(DATABASE_URL, Some("required by the Realtime Database driver"))?
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FirekitError::Config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(base_url = %base_url, "created Realtime Database driver");
        Ok(Self {
            client,
            base_url,
            access_token: config.get(ACCESS_TOKEN),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.access_token {
            Some(token) => request.query(&[("access_token", token)]),
            None => request,
        }
    }
}

#[async_trait]
impl DatabaseDriver for RealtimeDatabaseDriver {
    async fn get_document(&self, path: &str) -> FirekitResult<Option<Value>> {
        let response = self
            .authorize(self.client.get(self.url(path)))
            .send()
            .await?;
        let value: Value = ensure_success(response).await?.json().await?;

        Ok(match value {
            Value::Null => None,
            value => Some(value),
        })
    }

    async fn set_document(&self, path: &str, value: Value) -> FirekitResult<()> {
        let response = self
            .authorize(self.client.put(self.url(path)))
            .json(&value)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> FirekitResult<()> {
        let response = self
            .authorize(self.client.delete(self.url(path)))
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}
