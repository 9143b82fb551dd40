pub mod memory;
pub mod sample;

use crate::core::config::AppConfig;
use crate::core::storage::FinanceStorage;
use crate::providers::postgrest::PostgrestStorage;
use anyhow::Result;
use memory::MemoryStorage;
use std::sync::Arc;
use tracing::info;

/// Chooses the storage backend for the lifetime of the process.
///
/// A complete remote endpoint selects the hosted datastore; anything else
/// falls back to the sample-seeded in-memory storage.
pub fn open_storage(config: &AppConfig) -> Result<Arc<dyn FinanceStorage>> {
    match config.remote_endpoint() {
        Some(endpoint) => {
            info!(url = %endpoint.url, "Using hosted datastore");
            Ok(Arc::new(PostgrestStorage::new(&endpoint.url, &endpoint.api_key)?))
        }
        None => {
            info!("Remote datastore not configured, using sample data");
            Ok(Arc::new(MemoryStorage::seeded(&config.user_id)))
        }
    }
}
