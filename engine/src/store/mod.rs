pub mod file;
pub mod postgres;

use std::sync::Arc;
use anyhow::{Context, Result};
use tracing::info;
use discovery::{InMemoryTokenStore, TokenStore};
use crate::config::{EngineConfig, StoreBackend};

pub use file::JsonFileTokenStore;
pub use postgres::PostgresTokenStore;

/// Picks the persistence adapter named by `STORE_BACKEND`
pub async fn build_store(config: &EngineConfig) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.store_backend {
        StoreBackend::Memory => {
            info!("🧪 Using in-memory token store (nothing survives a restart)");
            Arc::new(InMemoryTokenStore::new())
        }
        StoreBackend::File => {
            info!("💾 Using JSON file token store at {}", config.store_dir);
            Arc::new(
                JsonFileTokenStore::new(&config.store_dir)
                    .await
                    .with_context(|| format!("opening token store dir {}", config.store_dir))?,
            )
        }
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("STORE_BACKEND=postgres requires DATABASE_URL")?;
            Arc::new(
                PostgresTokenStore::connect(url)
                    .await
                    .context("connecting to PostgreSQL token store")?,
            )
        }
    };
    Ok(store)
}
