//! Local mode: two flat JSON files under the data directory

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kotoba_core::store::{join_history, newest_first};
use kotoba_core::{LinkStatus, StorageMode, StoreError, StoreStatus, WordStore};
use kotoba_types::{ReviewOutcome, SavedWord, SavedWordView, SearchHistory};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;
use tokio::sync::Mutex;

const SAVED_FILE: &str = "db.json";
const HISTORY_FILE: &str = "history.json";

pub type HistoryMap = BTreeMap<String, SearchHistory>;

pub struct JsonStore {
    saved_path: PathBuf,
    history_path: PathBuf,
    /// Serializes read-modify-write cycles on both files
    lock: Mutex<()>,
}

impl JsonStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let dir = data_dir.as_ref();
        Self {
            saved_path: dir.join(SAVED_FILE),
            history_path: dir.join(HISTORY_FILE),
            lock: Mutex::new(()),
        }
    }

    pub async fn load_saved(&self) -> Result<Vec<SavedWord>, StoreError> {
        let _guard = self.lock.lock().await;
        read_json(&self.saved_path).await
    }

    pub async fn load_history(&self) -> Result<HistoryMap, StoreError> {
        let _guard = self.lock.lock().await;
        read_json(&self.history_path).await
    }
}

/// Missing or blank file reads as the empty value
async fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StoreError> {
    match fs::read_to_string(path).await {
        Ok(data) if data.trim().is_empty() => Ok(T::default()),
        Ok(data) => Ok(serde_json::from_str(&data)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Pretty-printed, through a temp file so a crash never leaves half a file
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir).await?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(value)?).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait::async_trait]
impl WordStore for JsonStore {
    async fn record_search(
        &self,
        word: &str,
        at: DateTime<Utc>,
    ) -> Result<SearchHistory, StoreError> {
        let _guard = self.lock.lock().await;
        let mut history: HistoryMap = read_json(&self.history_path).await?;

        let entry = history.entry(word.to_string()).or_default();
        let previous = entry.last_searched;
        entry.count += 1;
        entry.last_searched = Some(at);
        let count = entry.count;

        write_json(&self.history_path, &history).await?;

        Ok(SearchHistory {
            count,
            last_searched: previous,
        })
    }

    async fn saved_words(&self) -> Result<Vec<SavedWordView>, StoreError> {
        let _guard = self.lock.lock().await;
        let saved: Vec<SavedWord> = read_json(&self.saved_path).await?;
        let history: HistoryMap = read_json(&self.history_path).await?;
        Ok(join_history(saved, &history))
    }

    async fn save_word(&self, word: SavedWord) -> Result<Vec<SavedWord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut saved: Vec<SavedWord> = read_json(&self.saved_path).await?;

        if saved.iter().any(|w| w.is_same(&word.word, &word.reading)) {
            tracing::debug!("'{}' ({}) already saved", word.word, word.reading);
        } else {
            saved.push(word);
            write_json(&self.saved_path, &saved).await?;
        }

        Ok(newest_first(saved))
    }

    async fn delete_saved(
        &self,
        word: &str,
        reading: Option<&str>,
    ) -> Result<Vec<SavedWord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut saved: Vec<SavedWord> = read_json(&self.saved_path).await?;

        let before = saved.len();
        saved.retain(|w| !w.matches(word, reading));
        tracing::debug!("Removed {} saved record(s) for '{}'", before - saved.len(), word);

        write_json(&self.saved_path, &saved).await?;
        Ok(newest_first(saved))
    }

    async fn review(
        &self,
        word: &str,
        reading: Option<&str>,
        outcome: ReviewOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<SavedWord>, StoreError> {
        let _guard = self.lock.lock().await;
        let mut saved: Vec<SavedWord> = read_json(&self.saved_path).await?;

        let Some(target) = saved.iter_mut().find(|w| w.matches(word, reading)) else {
            return Ok(None);
        };
        target.flashcard_stats.record(outcome, at);
        let updated = target.clone();

        write_json(&self.saved_path, &saved).await?;
        Ok(Some(updated))
    }

    fn status(&self) -> StoreStatus {
        StoreStatus {
            mode: StorageMode::Local,
            link: LinkStatus::Connected,
        }
    }
}
