use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lookup direction chosen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Japanese query, Chinese gloss
    #[serde(rename = "ja-zh")]
    JaZh,
    /// Chinese query, Japanese result
    #[serde(rename = "zh-ja")]
    ZhJa,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::JaZh => "ja-zh",
            Direction::ZhJa => "zh-ja",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Japanese sentence
    pub jap: String,
    /// Traditional Chinese translation
    #[serde(default)]
    pub cht: String,
}

/// Search counter for a single word.
///
/// When attached to a search result, `last_searched` is the visit *before*
/// the current one, so a first search reports `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHistory {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub last_searched: Option<DateTime<Utc>>,
}

/// One dictionary card, as scraped and then enriched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub accent: String,
    /// Part of speech
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    /// Query the user typed when the entry was reached through translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<SearchHistory>,
    /// Examples were generated instead of scraped
    #[serde(default, rename = "isLLM", skip_serializing_if = "std::ops::Not::not")]
    pub is_llm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_meaning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_meaning: Option<String>,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            reading: reading.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardStats {
    #[serde(default)]
    pub correct: u32,
    #[serde(default)]
    pub incorrect: u32,
    #[serde(default)]
    pub last_review: Option<DateTime<Utc>>,
}

impl FlashcardStats {
    pub fn record(&mut self, outcome: ReviewOutcome, at: DateTime<Utc>) {
        match outcome {
            ReviewOutcome::Correct => self.correct += 1,
            ReviewOutcome::Incorrect => self.incorrect += 1,
        }
        self.last_review = Some(at);
    }
}

/// A word the user chose to keep
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWord {
    pub word: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub accent: String,
    #[serde(default)]
    pub part: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub examples: Vec<Example>,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub flashcard_stats: FlashcardStats,
}

impl SavedWord {
    pub fn from_entry(entry: WordEntry, saved_at: DateTime<Utc>) -> Self {
        Self {
            word: entry.word,
            reading: entry.reading,
            accent: entry.accent,
            part: entry.part,
            level: entry.level,
            meaning: entry.meaning,
            examples: entry.examples,
            saved_at,
            flashcard_stats: FlashcardStats::default(),
        }
    }

    /// Same headword and reading
    pub fn is_same(&self, word: &str, reading: &str) -> bool {
        self.word == word && self.reading == reading
    }

    /// Matches `word`, and `reading` too when one is given
    pub fn matches(&self, word: &str, reading: Option<&str>) -> bool {
        self.word == word && reading.is_none_or(|r| self.reading == r)
    }
}

/// Saved word joined with its search history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedWordView {
    #[serde(flatten)]
    pub saved: SavedWord,
    pub search_count: u64,
    pub last_searched: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOutcome {
    Correct,
    /// Anything other than "correct"
    #[serde(other)]
    Incorrect,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub word: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default)]
    pub meaning: String,
}

/// Explanation of a grammar pattern
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarPoint {
    pub grammar: String,
    #[serde(default)]
    pub meaning: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub examples: Vec<Example>,
}
