//! Cloud mode: MongoDB collections `histories` and `savedwords`

use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use bson::oid::ObjectId;
use bson::{Document, doc};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use kotoba_config::storage::StorageConfig;
use kotoba_core::store::{join_history, newest_first};
use kotoba_core::{LinkStatus, StorageMode, StoreError, StoreStatus, WordStore};
use kotoba_types::{
    Example, FlashcardStats, ReviewOutcome, SavedWord, SavedWordView, SearchHistory,
};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

use crate::json::JsonStore;

const HISTORY_COLLECTION: &str = "histories";
const SAVED_COLLECTION: &str = "savedwords";
/// Unique index on `word` alone, from before homographs were allowed
const LEGACY_WORD_INDEX: &str = "word_1";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDoc {
    word: String,
    #[serde(default)]
    count: i64,
    #[serde(default)]
    last_searched: Option<bson::DateTime>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsDoc {
    #[serde(default)]
    correct: i64,
    #[serde(default)]
    incorrect: i64,
    #[serde(default)]
    last_review: Option<bson::DateTime>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedDoc {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    word: String,
    #[serde(default)]
    reading: String,
    #[serde(default)]
    accent: String,
    #[serde(default)]
    part: String,
    #[serde(default)]
    level: String,
    #[serde(default)]
    meaning: String,
    #[serde(default)]
    examples: Vec<Example>,
    saved_at: Option<bson::DateTime>,
    #[serde(default)]
    flashcard_stats: StatsDoc,
}

impl From<SavedWord> for SavedDoc {
    fn from(w: SavedWord) -> Self {
        Self {
            id: None,
            word: w.word,
            reading: w.reading,
            accent: w.accent,
            part: w.part,
            level: w.level,
            meaning: w.meaning,
            examples: w.examples,
            saved_at: Some(bson::DateTime::from_chrono(w.saved_at)),
            flashcard_stats: StatsDoc {
                correct: i64::from(w.flashcard_stats.correct),
                incorrect: i64::from(w.flashcard_stats.incorrect),
                last_review: w.flashcard_stats.last_review.map(bson::DateTime::from_chrono),
            },
        }
    }
}

impl From<SavedDoc> for SavedWord {
    fn from(d: SavedDoc) -> Self {
        Self {
            word: d.word,
            reading: d.reading,
            accent: d.accent,
            part: d.part,
            level: d.level,
            meaning: d.meaning,
            examples: d.examples,
            saved_at: d.saved_at.map(|t| t.to_chrono()).unwrap_or_default(),
            flashcard_stats: FlashcardStats {
                correct: u32::try_from(d.flashcard_stats.correct).unwrap_or(0),
                incorrect: u32::try_from(d.flashcard_stats.incorrect).unwrap_or(0),
                last_review: d.flashcard_stats.last_review.map(|t| t.to_chrono()),
            },
        }
    }
}

fn db_err(e: mongodb::error::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == DUPLICATE_KEY
    )
}

fn pair_filter(word: &str, reading: Option<&str>) -> Document {
    match reading {
        Some(reading) => doc! { "word": word, "reading": reading },
        None => doc! { "word": word },
    }
}

pub struct MongoStore {
    client: Client,
    history: Collection<HistoryDoc>,
    saved: Collection<SavedDoc>,
    link: AtomicU8,
}

impl MongoStore {
    /// Connect and ping once; fails when no server is selectable within the timeout
    pub async fn connect(uri: &str, config: &StorageConfig) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await.map_err(db_err)?;
        options.server_selection_timeout =
            Some(Duration::from_millis(config.server_selection_timeout_ms));
        options.app_name = Some("kotoba".to_string());

        let client = Client::with_options(options).map_err(db_err)?;
        let db = client.database(&config.database);

        let store = Self {
            history: db.collection(HISTORY_COLLECTION),
            saved: db.collection(SAVED_COLLECTION),
            client,
            link: AtomicU8::new(link_to_u8(LinkStatus::Connecting)),
        };

        store.ping().await?;
        Ok(store)
    }

    /// Round-trip to the server, recording the link state
    pub async fn ping(&self) -> Result<(), StoreError> {
        let result = self
            .client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await;

        let status = if result.is_ok() {
            LinkStatus::Connected
        } else {
            LinkStatus::Disconnected
        };
        self.link.store(link_to_u8(status), Ordering::Relaxed);

        result.map(|_| ()).map_err(db_err)
    }

    pub fn link(&self) -> LinkStatus {
        link_from_u8(self.link.load(Ordering::Relaxed))
    }

    /// Drop the legacy `word_1` index and make sure the pair index exists
    pub async fn prepare_indexes(&self) -> Result<(), StoreError> {
        match self.saved.list_index_names().await {
            Ok(names) if names.iter().any(|n| n == LEGACY_WORD_INDEX) => {
                tracing::info!("Dropping legacy index: {}", LEGACY_WORD_INDEX);
                if let Err(e) = self.saved.drop_index(LEGACY_WORD_INDEX).await {
                    tracing::warn!("Index drop warning: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Could not list indexes: {}", e),
        }

        let unique = IndexOptions::builder().unique(true).build();

        self.saved
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "word": 1, "reading": 1 })
                    .options(unique.clone())
                    .build(),
            )
            .await
            .map_err(db_err)?;

        if let Err(e) = self
            .history
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "word": 1 })
                    .options(unique)
                    .build(),
            )
            .await
        {
            tracing::warn!("History index warning: {}", e);
        }

        Ok(())
    }

    /// Copy local files into empty collections
    pub async fn migrate_from(&self, local: &JsonStore) -> Result<(), StoreError> {
        let history_count = self.history.count_documents(doc! {}).await.map_err(db_err)?;
        if history_count == 0 {
            let docs: Vec<HistoryDoc> = local
                .load_history()
                .await?
                .into_iter()
                .map(|(word, h)| HistoryDoc {
                    word,
                    count: i64::try_from(h.count).unwrap_or(i64::MAX),
                    last_searched: h.last_searched.map(bson::DateTime::from_chrono),
                })
                .collect();

            if !docs.is_empty() {
                let n = docs.len();
                self.history.insert_many(docs).await.map_err(db_err)?;
                tracing::info!("Migrated {} history items to Cloud.", n);
            }
        }

        let saved_count = self.saved.count_documents(doc! {}).await.map_err(db_err)?;
        if saved_count == 0 {
            let docs: Vec<SavedDoc> = local
                .load_saved()
                .await?
                .into_iter()
                .map(SavedDoc::from)
                .collect();

            if !docs.is_empty() {
                let n = docs.len();
                match self.saved.insert_many(docs).await {
                    Ok(_) => tracing::info!("Migrated {} saved words to Cloud.", n),
                    Err(e) => tracing::warn!("Migration warning (saved words): {}", e),
                }
            }
        }

        Ok(())
    }

    async fn all_saved(&self) -> Result<Vec<SavedWord>, StoreError> {
        let docs: Vec<SavedDoc> = self
            .saved
            .find(doc! {})
            .sort(doc! { "savedAt": -1 })
            .await
            .map_err(db_err)?
            .try_collect()
            .await
            .map_err(db_err)?;

        Ok(newest_first(docs.into_iter().map(SavedWord::from).collect()))
    }
}

#[async_trait::async_trait]
impl WordStore for MongoStore {
    async fn record_search(
        &self,
        word: &str,
        at: DateTime<Utc>,
    ) -> Result<SearchHistory, StoreError> {
        let previous = self
            .history
            .find_one_and_update(
                doc! { "word": word },
                doc! {
                    "$inc": { "count": 1 },
                    "$set": { "lastSearched": bson::DateTime::from_chrono(at) },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::Before)
            .await
            .map_err(db_err)?;

        let count = previous.as_ref().map(|d| d.count).unwrap_or(0) + 1;
        Ok(SearchHistory {
            count: u64::try_from(count).unwrap_or(0),
            last_searched: previous
                .and_then(|d| d.last_searched)
                .map(|t| t.to_chrono()),
        })
    }

    async fn saved_words(&self) -> Result<Vec<SavedWordView>, StoreError> {
        let saved = self.all_saved().await?;
        let words: Vec<&str> = saved.iter().map(|w| w.word.as_str()).collect();

        let history = self
            .history
            .find(doc! { "word": { "$in": words } })
            .await
            .map_err(db_err)?
            .try_collect::<Vec<HistoryDoc>>()
            .await
            .map_err(db_err)?
            .into_iter()
            .map(|d| {
                (
                    d.word,
                    SearchHistory {
                        count: u64::try_from(d.count).unwrap_or(0),
                        last_searched: d.last_searched.map(|t| t.to_chrono()),
                    },
                )
            })
            .collect();

        Ok(join_history(saved, &history))
    }

    async fn save_word(&self, word: SavedWord) -> Result<Vec<SavedWord>, StoreError> {
        let existing = self
            .saved
            .find_one(doc! { "word": &word.word, "reading": &word.reading })
            .await
            .map_err(db_err)?;

        if existing.is_none() {
            match self.saved.insert_one(SavedDoc::from(word)).await {
                Ok(_) => {}
                Err(e) if is_duplicate_key(&e) => {
                    tracing::warn!("Duplicate entry ignored.");
                }
                Err(e) => return Err(db_err(e)),
            }
        }

        self.all_saved().await
    }

    async fn delete_saved(
        &self,
        word: &str,
        reading: Option<&str>,
    ) -> Result<Vec<SavedWord>, StoreError> {
        let filter = pair_filter(word, reading);
        let deleted = if reading.is_some() {
            self.saved.delete_one(filter).await
        } else {
            self.saved.delete_many(filter).await
        }
        .map_err(db_err)?;
        tracing::debug!("Removed {} saved record(s) for '{}'", deleted.deleted_count, word);

        self.all_saved().await
    }

    async fn review(
        &self,
        word: &str,
        reading: Option<&str>,
        outcome: ReviewOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<SavedWord>, StoreError> {
        let field = match outcome {
            ReviewOutcome::Correct => "flashcardStats.correct",
            ReviewOutcome::Incorrect => "flashcardStats.incorrect",
        };

        let updated = self
            .saved
            .find_one_and_update(
                pair_filter(word, reading),
                doc! {
                    "$inc": { field: 1 },
                    "$set": { "flashcardStats.lastReview": bson::DateTime::from_chrono(at) },
                },
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(db_err)?;

        Ok(updated.map(SavedWord::from))
    }

    fn status(&self) -> StoreStatus {
        StoreStatus {
            mode: StorageMode::Cloud,
            link: self.link(),
        }
    }
}

fn link_to_u8(status: LinkStatus) -> u8 {
    match status {
        LinkStatus::Disconnected => 0,
        LinkStatus::Connected => 1,
        LinkStatus::Connecting => 2,
    }
}

fn link_from_u8(value: u8) -> LinkStatus {
    match value {
        1 => LinkStatus::Connected,
        2 => LinkStatus::Connecting,
        _ => LinkStatus::Disconnected,
    }
}

#[cfg(test)]
mod tests {
    use kotoba_types::WordEntry;

    use super::*;

    #[test]
    fn saved_word_survives_document_conversion() {
        let at = DateTime::from_timestamp_millis(1_714_557_600_000).unwrap();
        let mut word = SavedWord::from_entry(WordEntry::new("猫", "ねこ"), at);
        word.flashcard_stats.record(ReviewOutcome::Correct, at);

        let back = SavedWord::from(SavedDoc::from(word.clone()));

        assert_eq!(back, word);
    }

    #[test]
    fn filter_includes_reading_only_when_given() {
        assert_eq!(pair_filter("生", None), doc! { "word": "生" });
        assert_eq!(
            pair_filter("生", Some("なま")),
            doc! { "word": "生", "reading": "なま" }
        );
    }

    #[test]
    fn link_state_round_trips() {
        for status in [
            LinkStatus::Disconnected,
            LinkStatus::Connected,
            LinkStatus::Connecting,
        ] {
            assert_eq!(link_from_u8(link_to_u8(status)), status);
        }
    }
}
