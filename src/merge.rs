//! Multi-source provider catalog merger.
//!
//! Fans out one fetch per regional backend, waits for every branch to
//! settle (success, failure, or timeout), then reduces the results on a
//! single thread: classify, stamp the source, dedupe on identity key,
//! drop unlinkable records. A branch failing never fails the call; only
//! all branches failing does.

use crate::classifier::{self, ProviderType};
use crate::model::Provider;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// One regional backend's provider catalog.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Logical name stamped onto every record this source contributes.
    fn name(&self) -> &str;

    async fn fetch_catalog(&self) -> Result<Vec<Provider>>;
}

/// A provider surfaced to consumers: identity, classification, and source
/// are all resolved exactly once here and never re-inspected downstream.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: String,
    pub name: Option<String>,
    pub logo_url: Option<String>,
    pub provider_type: ProviderType,
    pub source_api: String,
    pub sort_order: Option<i64>,
    /// Other sources that offered the same identity key. Diagnostics only.
    pub also_offered_by: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SourceFailure {
    pub source: String,
    pub message: String,
}

/// A record dropped during the reduction, kept for diagnostics.
#[derive(Debug, Clone)]
pub struct DataError {
    pub source: String,
    pub detail: String,
}

#[derive(Debug)]
pub struct MergeOutcome {
    pub providers: Vec<CatalogEntry>,
    pub failures: Vec<SourceFailure>,
    pub data_errors: Vec<DataError>,
}

/// Merge the catalogs of every configured source.
///
/// Branches run concurrently with an independent timeout each; a slow
/// region neither blocks nor corrupts a fast one. Duplicate identity keys
/// keep the first record in fetch-completion order. Errors only when all
/// sources fail.
pub async fn merge_catalogs(
    sources: &[Box<dyn CatalogSource>],
    timeout: Duration,
) -> Result<MergeOutcome> {
    let mut branches: FuturesUnordered<_> = sources
        .iter()
        .map(|source| async move {
            let result = match tokio::time::timeout(timeout, source.fetch_catalog()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow!("timed out after {timeout:?}")),
            };
            (source.name().to_string(), result)
        })
        .collect();

    // Settled branches in completion order; dedupe depends on this.
    let mut settled = Vec::with_capacity(sources.len());
    while let Some(outcome) = branches.next().await {
        settled.push(outcome);
    }

    let mut providers: Vec<CatalogEntry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut failures = Vec::new();
    let mut data_errors = Vec::new();

    for (source_api, result) in settled {
        let records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!(source = %source_api, error = %e, "Catalog source failed");
                failures.push(SourceFailure {
                    source: source_api,
                    message: e.to_string(),
                });
                continue;
            }
        };

        debug!(source = %source_api, count = records.len(), "Merging catalog");
        for record in records {
            if !record.is_linkable() {
                continue;
            }
            let Some(key) = record.identity_key() else {
                data_errors.push(DataError {
                    source: source_api.clone(),
                    detail: format!(
                        "provider {:?} has neither id nor ttsId",
                        record.name.as_deref().unwrap_or("<unnamed>")
                    ),
                });
                continue;
            };
            if let Some(index) = seen.get(key) {
                providers[*index].also_offered_by.push(source_api.clone());
                continue;
            }
            let key = key.to_string();
            let entry = CatalogEntry {
                id: key.clone(),
                name: record.name.clone(),
                logo_url: record.logo_url.clone(),
                provider_type: classifier::classify(&record),
                source_api: source_api.clone(),
                sort_order: record.sort_order,
                also_offered_by: Vec::new(),
            };
            seen.insert(key, providers.len());
            providers.push(entry);
        }
    }

    if failures.len() == sources.len() && !sources.is_empty() {
        return Err(anyhow!(
            "all {} catalog sources failed: {}",
            failures.len(),
            failures
                .iter()
                .map(|f| format!("{}: {}", f.source, f.message))
                .collect::<Vec<_>>()
                .join("; ")
        ));
    }

    Ok(MergeOutcome {
        providers,
        failures,
        data_errors,
    })
}
