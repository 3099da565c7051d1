use std::sync::Arc;

use chrono::Utc;
use kotoba_core::preprocess::normalize_query;
use kotoba_core::{Dictionary, LookupError, WordStore};
use kotoba_translator::AssistError;
use kotoba_types::{Direction, SearchHistory, WordEntry};

use crate::script::looks_chinese;
use crate::tutor::JapaneseTutor;

/// Japanese lookup: dictionary first, LLM fallbacks after, enrichment last
pub struct JapaneseProcessor {
    dictionary: Arc<dyn Dictionary>,
    tutor: Option<JapaneseTutor>,
    enrich_limit: usize,
}

/// Tracks whether any LLM fallback was refused for quota
#[derive(Default)]
struct FallbackState {
    rate_limited: bool,
}

impl FallbackState {
    fn note(&mut self, step: &str, error: &AssistError) {
        tracing::warn!("{} failed: {}", step, error);
        self.rate_limited |= error.is_rate_limited();
    }
}

impl JapaneseProcessor {
    pub fn new(
        dictionary: Arc<dyn Dictionary>,
        tutor: Option<JapaneseTutor>,
        enrich_limit: usize,
    ) -> Self {
        Self {
            dictionary,
            tutor,
            enrich_limit,
        }
    }

    pub fn tutor(&self) -> Option<&JapaneseTutor> {
        self.tutor.as_ref()
    }

    /// Scrape errors are logged and read as "nothing found"
    async fn scrape(&self, query: &str) -> Vec<WordEntry> {
        match self.dictionary.lookup(query).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "{} lookup of '{}' failed: {}",
                    self.dictionary.metadata().name,
                    query,
                    e
                );
                Vec::new()
            }
        }
    }

    pub async fn lookup(
        &self,
        query: &str,
        direction: Direction,
        store: &dyn WordStore,
    ) -> Result<Vec<WordEntry>, LookupError> {
        let query = normalize_query(query);
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        tracing::info!("Attempting direct search for '{}'", query);
        let mut results = self.scrape(&query).await;
        let mut fallback = FallbackState::default();

        if results.is_empty()
            && let Some(tutor) = &self.tutor
        {
            tracing::debug!("Direct search failed for '{}'. Checking fallbacks", query);

            if direction == Direction::ZhJa && looks_chinese(&query) {
                match tutor.translate_to_japanese(&query).await {
                    Ok(translated) if !translated.is_empty() => {
                        tracing::info!("Translated '{}' to '{}'", query, translated);
                        results = self.scrape(&translated).await;
                        for entry in &mut results {
                            entry.original_query = Some(query.clone());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => fallback.note("Translation", &e),
                }
            }

            if results.is_empty() {
                match tutor.to_hiragana(&query).await {
                    Ok(hiragana) if !hiragana.is_empty() && hiragana != query => {
                        tracing::info!("Converted '{}' to '{}'", query, hiragana);
                        results = self.scrape(&hiragana).await;
                    }
                    Ok(_) => {}
                    Err(e) => fallback.note("Hiragana conversion", &e),
                }
            }
        }

        if results.is_empty() {
            return Err(if fallback.rate_limited {
                LookupError::QuotaExceeded
            } else {
                LookupError::NotFound
            });
        }

        let enrich = results.len() <= self.enrich_limit;
        for entry in &mut results {
            self.attach_history(entry, store).await;
            if enrich && let Some(tutor) = &self.tutor {
                enrich_entry(tutor, entry, direction).await;
            }
        }

        Ok(results)
    }

    async fn attach_history(&self, entry: &mut WordEntry, store: &dyn WordStore) {
        let now = Utc::now();
        let history = match store.record_search(&entry.word, now).await {
            Ok(history) => history,
            Err(e) => {
                tracing::error!("History update for '{}' failed: {}", entry.word, e);
                SearchHistory {
                    count: 1,
                    last_searched: Some(now),
                }
            }
        };
        entry.history = Some(history);
    }
}

/// Best-effort LLM additions; failures leave the fields untouched
async fn enrich_entry(tutor: &JapaneseTutor, entry: &mut WordEntry, direction: Direction) {
    if entry.examples.is_empty() {
        tracing::debug!("No examples for '{}'. Generating", entry.word);
        match tutor.example_sentences(&entry.word, &entry.meaning).await {
            Ok(examples) => {
                entry.examples = examples;
                entry.is_llm = true;
            }
            Err(e) => tracing::warn!("Example generation for '{}' failed: {}", entry.word, e),
        }
    }

    if direction == Direction::JaZh {
        match tutor.gloss(&entry.word, &entry.reading).await {
            Ok(gloss) => {
                entry.translated_meaning = Some(gloss);
                entry.original_meaning = Some(entry.meaning.clone());
            }
            Err(e) => tracing::warn!("Gloss for '{}' failed: {}", entry.word, e),
        }
    }
}
