use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_database() -> String {
    "kotoba".to_string()
}

fn default_server_selection_timeout_ms() -> u64 {
    15000
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_ping_interval_ms() -> u64 {
    30000
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct StorageConfig {
    /// Cloud store; local JSON files are used when unset or unreachable
    #[serde(default)]
    pub mongodb_uri: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_server_selection_timeout_ms")]
    pub server_selection_timeout_ms: u64,
    /// Holds `db.json` and `history.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_ping_interval_ms")]
    pub ping_interval_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mongodb_uri: None,
            database: default_database(),
            server_selection_timeout_ms: default_server_selection_timeout_ms(),
            data_dir: default_data_dir(),
            ping_interval_ms: default_ping_interval_ms(),
        }
    }
}

impl StorageConfig {
    pub fn apply_env(&mut self) {
        if let Ok(uri) = env::var("MONGODB_URI")
            && !uri.trim().is_empty()
        {
            self.mongodb_uri = Some(uri);
        }
        if let Ok(dir) = env::var("KOTOBA_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
    }
}
