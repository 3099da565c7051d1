use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    60000
}

/// Shut the server down once the client stops sending heartbeats
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct WatchdogConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl WatchdogConfig {
    pub fn apply_env(&mut self) {
        if let Some(timeout_ms) = env::var("WATCHDOG_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_ms = timeout_ms;
        }
    }
}
