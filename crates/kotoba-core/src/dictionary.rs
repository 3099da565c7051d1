use kotoba_types::WordEntry;

use crate::error::ScrapeError;

/// Dictionary lookup operations
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// All cards the source lists for `query`; empty when it has none
    async fn lookup(&self, query: &str) -> Result<Vec<WordEntry>, ScrapeError>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub base_url: String,
}
