use std::sync::Arc;

use tracing::{error, info, warn};

use crate::config::{Config, StoreBackend};
use crate::store::Ledger;
use crate::store::google::GoogleSheets;
use crate::store::memory::MemoryStore;

/// Connects the configured backend.
///
/// Never fails: a connector that cannot start leaves an unavailable ledger so
/// the server still comes up and serves the form.
pub async fn init_store(config: &Config) -> Ledger {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("Using in-memory store, records are lost on restart");
            Ledger::connected(Arc::new(MemoryStore::with_headers()))
        }
        StoreBackend::Sheets => match GoogleSheets::connect(config).await {
            Ok(sheets) => {
                info!("Spreadsheet store ready");
                Ledger::connected(Arc::new(sheets))
            }
            Err(e) => {
                error!(
                    error = %format!("{e:#}"),
                    "Failed to connect to Google Sheets. Check SPREADSHEET_ID, the credentials file and sharing settings"
                );
                Ledger::unavailable()
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn failed_connect_degrades_instead_of_aborting() {
        let config = Config {
            spreadsheet_id: "sheet".into(),
            credentials_file: "/nonexistent/credentials.json".into(),
            ..Config::default()
        };
        assert!(!init_store(&config).await.is_available());
    }

    #[actix_web::test]
    async fn memory_backend_is_always_available() {
        let config = Config {
            store_backend: StoreBackend::Memory,
            ..Config::default()
        };
        assert!(init_store(&config).await.is_available());
    }
}
