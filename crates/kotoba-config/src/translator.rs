use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_enrich_limit() -> usize {
    3
}

fn default_timeout_secs() -> u64 {
    30
}

/// LLM provider settings
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Result sets larger than this skip example generation and glossing
    #[serde(default = "default_enrich_limit")]
    pub enrich_limit: usize,
    /// Per-request limit for `generateContent` and model listing
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
            enrich_limit: default_enrich_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl TranslatorConfig {
    pub fn apply_env(&mut self) {
        if let Ok(key) = env::var("GEMINI_API_KEY") {
            self.api_key = key;
        }
        if let Ok(model) = env::var("GEMINI_MODEL") {
            self.model = model;
        }
    }

    /// Enabled and holding a key
    pub fn is_usable(&self) -> bool {
        self.enabled && !self.api_key.trim().is_empty()
    }
}
