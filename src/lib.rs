pub mod cache;
pub mod classifier;
pub mod config;
pub mod currency;
pub mod icon;
pub mod log;
pub mod merge;
pub mod model;
pub mod networth;
pub mod sources;
pub mod summary;
pub mod ui;

use crate::merge::CatalogSource;
use crate::model::Provider;
use crate::sources::HttpBackendSource;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy)]
pub enum AppCommand {
    /// Net-worth totals and grouped accounts from the primary endpoint.
    Summary,
    /// Merged linkable-provider catalog from all endpoints.
    Providers,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Wealth Lens starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog_cache = Arc::new(cache::Cache::<String, Vec<Provider>>::new());
    let timeout = Duration::from_secs(config.fetch_timeout_secs);

    match command {
        AppCommand::Summary => {
            let primary = config.primary_endpoint()?;
            let source = HttpBackendSource::new(
                &primary.name,
                &primary.base_url,
                primary.api_key.as_deref(),
                Arc::clone(&catalog_cache),
            );
            let snapshot = source.fetch_snapshot().await?;
            let report = summary::NetWorthReport::build(
                &snapshot.accounts,
                &snapshot.exchange_rates,
                &config.currency,
            );
            println!("{}", report.display_as_table());
            ui::print_separator();
            println!("{}", report.display_group_details());
        }
        AppCommand::Providers => {
            let sources: Vec<Box<dyn CatalogSource>> = config
                .endpoints
                .iter()
                .map(|endpoint| {
                    Box::new(HttpBackendSource::new(
                        &endpoint.name,
                        &endpoint.base_url,
                        endpoint.api_key.as_deref(),
                        Arc::clone(&catalog_cache),
                    )) as Box<dyn CatalogSource>
                })
                .collect();

            let pb = ui::new_progress_bar(sources.len() as u64, true);
            pb.set_message("Fetching provider catalogs...");
            let outcome = merge::merge_catalogs(&sources, timeout).await;
            pb.finish_and_clear();

            println!("{}", summary::display_provider_catalog(&outcome?));
        }
    }

    Ok(())
}
