use std::time::Duration;

use async_trait::async_trait;
use kotoba_config::translator::TranslatorConfig;
use kotoba_translator::{AssistError, LanguageModel, ProviderMetadata};
use serde::Deserialize;
use serde_json::json;

#[derive(Clone)]
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
    api_url: String,
    model: String,
}

/// Model entry of the `models` listing
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelInfo {
    pub fn can_generate(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

impl GenerateReply {
    /// Text parts of the first candidate, joined
    fn text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Some(text)
    }
}

impl GeminiModel {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AssistError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn from_config(config: &TranslatorConfig) -> Result<Self, AssistError> {
        Self::new(
            config.api_key.trim().to_string(),
            config.api_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Models available to this key that support content generation
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, AssistError> {
        if self.api_key.is_empty() {
            return Err(AssistError::AuthenticationError);
        }

        let response = self
            .client
            .get(format!("{}/models", self.api_url))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let response = check_status(response).await?;

        let list: ModelList = response.json().await.map_err(|e| {
            AssistError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        Ok(list.models.into_iter().filter(ModelInfo::can_generate).collect())
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AssistError> {
    let status = response.status();

    if status == 429 {
        return Err(AssistError::RateLimitExceeded);
    }

    if status == 401 || status == 403 {
        return Err(AssistError::AuthenticationError);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AssistError::ApiError(format!("HTTP {}: {}", status, body.trim())));
    }

    Ok(response)
}

#[async_trait]
impl LanguageModel for GeminiModel {
    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        if self.api_key.is_empty() {
            return Err(AssistError::AuthenticationError);
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.api_url, self.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let response = check_status(response).await?;

        let reply: GenerateReply = response.json().await.map_err(|e| {
            AssistError::ApiError(format!("Failed to parse response: {}", e))
        })?;

        reply
            .text()
            .ok_or_else(|| AssistError::ApiError("No candidate in response".to_string()))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Gemini".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}
