// @file: contact_engine/src/main.rs
// @description: Boots configuration, logging, the contact service and the WebSocket server.
// @author: LAS.

use std::path::Path;
use std::sync::Arc;
use anyhow::Context;
use log::{info, warn};
use contact_engine::api::connection_manager::ConnectionManager;
use contact_engine::api::ws_server;
use contact_engine::core::service::ContactService;
use contact_engine::core::store::InMemoryContactStore;
use contact_engine::utils::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment & Config
    dotenv::dotenv().ok();
    let config: AppConfig = AppConfig::load().context("failed to load configuration")?;

    // 2. Logger (RUST_LOG wins over the configured level)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_level.as_str())).init();

    info!(">>> Contact Engine is Starting... <<<");

    // 3. Wire Components
    let store = Arc::new(InMemoryContactStore::new());
    let manager = ConnectionManager::from_config(&config);
    let service = ContactService::new(store, Arc::new(manager.clone()), config.max_upload_bytes);

    // 4. Optional Seed Import
    if let Some(path) = &config.seed_csv_path {
        seed_contacts(&service, path).await;
    }

    // 5. Run Until Ctrl-C
    tokio::select! {
        result = ws_server::start_server(manager.clone(), config.clone()) => {
            result.context("WebSocket server failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!(">>> Shutdown requested <<<");
        }
    }

    manager.shutdown().await;
    Ok(())
}

async fn seed_contacts(service: &ContactService, path: &str) {
    let bytes: Vec<u8> = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Seed file {} could not be read: {}", path, e);
            return;
        }
    };
    let file_name: &str = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path);

    match service.import_csv(file_name, &bytes).await {
        Ok(summary) => info!(
            "Seed import: {} (rows read: {}, imported: {}, skipped: {})",
            summary.message, summary.rows_read, summary.imported, summary.skipped
        ),
        Err(e) => warn!("Seed import failed: {}", e),
    }
}
