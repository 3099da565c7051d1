use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::network::NetworkConfig;
use self::storage::StorageConfig;
use self::translator::TranslatorConfig;
use self::watchdog::WatchdogConfig;

pub mod dictionary;
pub mod network;
pub mod storage;
pub mod translator;
pub mod watchdog;

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,
    pub storage: StorageConfig,
    pub watchdog: WatchdogConfig,

    /// Used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            dictionary: DictionaryConfig::default(),
            translator: TranslatorConfig::default(),
            storage: StorageConfig::default(),
            watchdog: WatchdogConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Defaults overridden by the environment
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Environment variables win over file values
    pub fn apply_env(&mut self) {
        self.network.apply_env();
        self.translator.apply_env();
        self.storage.apply_env();
        self.watchdog.apply_env();
    }
}
