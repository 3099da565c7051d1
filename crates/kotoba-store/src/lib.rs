//! Persistence routed to MongoDB or to local JSON files.
//!
//! The mode is decided once at boot: a reachable MongoDB means cloud mode for
//! the lifetime of the process, anything else falls back to local files.

mod json;
mod mongo;

pub use json::{HistoryMap, JsonStore};
pub use mongo::MongoStore;

use chrono::{DateTime, Utc};
use kotoba_config::storage::StorageConfig;
use kotoba_core::{LinkStatus, StorageMode, StoreError, StoreStatus, WordStore};
use kotoba_types::{ReviewOutcome, SavedWord, SavedWordView, SearchHistory};

pub struct Storage {
    local: JsonStore,
    cloud: Option<MongoStore>,
}

impl Storage {
    /// Try the cloud store, switching to local mode on any failure
    pub async fn connect(config: &StorageConfig) -> Self {
        let local = JsonStore::new(&config.data_dir);

        let Some(uri) = config.mongodb_uri.as_deref() else {
            tracing::warn!("No MongoDB URI configured. Using LOCAL JSON mode.");
            return Self { local, cloud: None };
        };

        match MongoStore::connect(uri, config).await {
            Ok(cloud) => {
                tracing::info!("Connected to MongoDB");

                if let Err(e) = cloud.prepare_indexes().await {
                    tracing::warn!("Index setup failed: {}", e);
                }
                if let Err(e) = cloud.migrate_from(&local).await {
                    tracing::error!("Migration failed: {}", e);
                }

                Self {
                    local,
                    cloud: Some(cloud),
                }
            }
            Err(e) => {
                tracing::error!(
                    "MongoDB connection failed (Timeout or Auth Error). Switching to LOCAL JSON mode."
                );
                tracing::error!("Connection Error Details: {}", e);
                Self { local, cloud: None }
            }
        }
    }

    pub fn mode(&self) -> StorageMode {
        if self.cloud.is_some() {
            StorageMode::Cloud
        } else {
            StorageMode::Local
        }
    }

    /// Refresh the cloud link state; no-op in local mode
    pub async fn ping(&self) -> LinkStatus {
        match &self.cloud {
            Some(cloud) => {
                if let Err(e) = cloud.ping().await {
                    tracing::warn!("MongoDB ping failed: {}", e);
                }
                cloud.link()
            }
            None => LinkStatus::Connected,
        }
    }

    fn active(&self) -> &dyn WordStore {
        match &self.cloud {
            Some(cloud) => cloud as &dyn WordStore,
            None => &self.local,
        }
    }
}

#[async_trait::async_trait]
impl WordStore for Storage {
    async fn record_search(
        &self,
        word: &str,
        at: DateTime<Utc>,
    ) -> Result<SearchHistory, StoreError> {
        self.active().record_search(word, at).await
    }

    async fn saved_words(&self) -> Result<Vec<SavedWordView>, StoreError> {
        // A dropped cloud link still lets the client list what it has locally
        if let Some(cloud) = &self.cloud
            && cloud.link() != LinkStatus::Connected
        {
            tracing::info!("Using Local DB (link: {})", cloud.link().as_str());
            return self.local.saved_words().await;
        }
        self.active().saved_words().await
    }

    async fn save_word(&self, word: SavedWord) -> Result<Vec<SavedWord>, StoreError> {
        self.active().save_word(word).await
    }

    async fn delete_saved(
        &self,
        word: &str,
        reading: Option<&str>,
    ) -> Result<Vec<SavedWord>, StoreError> {
        self.active().delete_saved(word, reading).await
    }

    async fn review(
        &self,
        word: &str,
        reading: Option<&str>,
        outcome: ReviewOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<SavedWord>, StoreError> {
        self.active().review(word, reading, outcome, at).await
    }

    fn status(&self) -> StoreStatus {
        self.active().status()
    }
}
