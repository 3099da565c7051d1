use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use kotoba_types::{ReviewOutcome, SavedWord, SavedWordView, SearchHistory};

use crate::error::StoreError;

/// Persistence for search history and saved words
#[async_trait::async_trait]
pub trait WordStore: Send + Sync {
    /// Bump the counter for `word`. Returns the new count together with the
    /// previous `last_searched`.
    async fn record_search(&self, word: &str, at: DateTime<Utc>)
    -> Result<SearchHistory, StoreError>;

    /// Saved words joined with history, newest first
    async fn saved_words(&self) -> Result<Vec<SavedWordView>, StoreError>;

    /// Insert unless the (word, reading) pair exists. Returns the saved list, newest first.
    async fn save_word(&self, word: SavedWord) -> Result<Vec<SavedWord>, StoreError>;

    /// Delete the (word, reading) pair, or every record of `word` without a reading
    async fn delete_saved(
        &self,
        word: &str,
        reading: Option<&str>,
    ) -> Result<Vec<SavedWord>, StoreError>;

    /// Count a flashcard answer on the first matching record
    async fn review(
        &self,
        word: &str,
        reading: Option<&str>,
        outcome: ReviewOutcome,
        at: DateTime<Utc>,
    ) -> Result<Option<SavedWord>, StoreError>;

    fn status(&self) -> StoreStatus;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Cloud,
    Local,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Cloud => "cloud",
            StorageMode::Local => "local",
        }
    }
}

/// State of the link to the cloud store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connected,
    Connecting,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Disconnected => "disconnected",
            LinkStatus::Connected => "connected",
            LinkStatus::Connecting => "connecting",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStatus {
    pub mode: StorageMode,
    pub link: LinkStatus,
}

/// Attach search counters to saved words and order them newest first
pub fn join_history(
    saved: Vec<SavedWord>,
    history: &BTreeMap<String, SearchHistory>,
) -> Vec<SavedWordView> {
    let mut views: Vec<SavedWordView> = saved
        .into_iter()
        .map(|saved| {
            let entry = history.get(&saved.word);
            SavedWordView {
                search_count: entry.map(|h| h.count).unwrap_or(0),
                last_searched: entry.and_then(|h| h.last_searched),
                saved,
            }
        })
        .collect();

    views.sort_by(|a, b| b.saved.saved_at.cmp(&a.saved.saved_at));
    views
}

/// Newest first
pub fn newest_first(mut saved: Vec<SavedWord>) -> Vec<SavedWord> {
    saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
    saved
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use kotoba_types::WordEntry;

    use super::*;

    #[test]
    fn join_defaults_missing_history_and_sorts() {
        let now = Utc::now();
        let old = SavedWord::from_entry(WordEntry::new("猫", "ねこ"), now - Duration::days(1));
        let new = SavedWord::from_entry(WordEntry::new("犬", "いぬ"), now);

        let mut history = BTreeMap::new();
        history.insert(
            "猫".to_string(),
            SearchHistory {
                count: 4,
                last_searched: Some(now),
            },
        );

        let views = join_history(vec![old, new], &history);

        assert_eq!(views[0].saved.word, "犬");
        assert_eq!(views[0].search_count, 0);
        assert_eq!(views[0].last_searched, None);
        assert_eq!(views[1].saved.word, "猫");
        assert_eq!(views[1].search_count, 4);
        assert_eq!(views[1].last_searched, Some(now));
    }
}
