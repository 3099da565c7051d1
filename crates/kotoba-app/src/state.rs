use std::sync::Arc;

use kotoba_core::WordStore;
use kotoba_lang_japanese::{JapaneseProcessor, JapaneseTutor};

use crate::watchdog::Heartbeat;

pub struct AppState {
    pub processor: JapaneseProcessor,
    pub store: Arc<dyn WordStore>,
    pub heartbeat: Heartbeat,
}

impl AppState {
    pub fn new(processor: JapaneseProcessor, store: Arc<dyn WordStore>, heartbeat: Heartbeat) -> Self {
        Self {
            processor,
            store,
            heartbeat,
        }
    }

    /// `None` without a usable LLM key
    pub fn tutor(&self) -> Option<&JapaneseTutor> {
        self.processor.tutor()
    }
}
