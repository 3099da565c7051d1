use serde::de::DeserializeOwned;

/// Text-generation provider interface
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send a prompt, get the reply text back
    async fn generate(&self, prompt: &str) -> Result<String, AssistError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded (HTTP 429)")]
    RateLimitExceeded,

    #[error("Authentication error")]
    AuthenticationError,

    #[error("Malformed reply: {0}")]
    MalformedReply(String),
}

impl AssistError {
    /// Quota exhausted, as opposed to any other failure
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AssistError::RateLimitExceeded)
    }
}

/// Remove Markdown code fences the model likes to wrap JSON in
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Decode a JSON reply, tolerating code fences
pub fn parse_json_reply<T: DeserializeOwned>(reply: &str) -> Result<T, AssistError> {
    serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| AssistError::MalformedReply(format!("{e}: {}", reply.trim())))
}
