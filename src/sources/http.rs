//! Regional backend client.
//!
//! Each deployment exposes the same two read-only endpoints: the linkable
//! provider catalog and the customer's aggregate snapshot. The engine only
//! ever sees the decoded in-memory records.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::cache::Cache;
use crate::merge::CatalogSource;
use crate::model::{AggregateSnapshot, Provider};

const API_KEY_HEADER: &str = "x-api-key";

pub struct HttpBackendSource {
    name: String,
    base_url: String,
    api_key: Option<String>,
    catalog_cache: Arc<Cache<String, Vec<Provider>>>,
}

impl HttpBackendSource {
    pub fn new(
        name: &str,
        base_url: &str,
        api_key: Option<&str>,
        catalog_cache: Arc<Cache<String, Vec<Provider>>>,
    ) -> Self {
        HttpBackendSource {
            name: name.to_string(),
            base_url: base_url.to_string(),
            api_key: api_key.map(str::to_string),
            catalog_cache,
        }
    }

    fn request(&self, url: &str) -> Result<reqwest::RequestBuilder> {
        let client = reqwest::Client::builder()
            .user_agent("wealthlens/0.2")
            .build()?;
        let mut request = client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        Ok(request)
    }

    /// Fetch the customer's aggregate snapshot from this deployment.
    #[instrument(name = "SnapshotFetch", skip(self), fields(source = %self.name))]
    pub async fn fetch_snapshot(&self) -> Result<AggregateSnapshot> {
        let url = format!("{}/v1/aggregate", self.base_url);
        debug!("Requesting aggregate snapshot from {}", url);

        let response = self
            .request(&url)?
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for source: {} URL: {}", e, self.name, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for source: {}",
                response.status(),
                self.name
            ));
        }

        let snapshot = response.json::<AggregateSnapshot>().await.map_err(|e| {
            anyhow!("Failed to parse snapshot from source {}: {}", self.name, e)
        })?;
        debug!(
            accounts = snapshot.accounts.len(),
            providers = snapshot.service_providers.len(),
            "Decoded aggregate snapshot"
        );
        Ok(snapshot)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogResponse {
    #[serde(default)]
    service_providers: Vec<Provider>,
}

#[async_trait]
impl CatalogSource for HttpBackendSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "CatalogFetch", skip(self), fields(source = %self.name))]
    async fn fetch_catalog(&self) -> Result<Vec<Provider>> {
        if let Some(cached) = self.catalog_cache.get(&self.name).await {
            return Ok(cached);
        }

        let url = format!("{}/v1/service-providers", self.base_url);
        debug!("Requesting provider catalog from {}", url);

        let response = self
            .request(&url)?
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for source: {} URL: {}", e, self.name, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for source: {}",
                response.status(),
                self.name
            ));
        }

        let text = response.text().await?;
        let data: CatalogResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse catalog from source {}: {}", self.name, e))?;

        self.catalog_cache
            .put(self.name.clone(), data.service_providers.clone())
            .await;

        Ok(data.service_providers)
    }
}
