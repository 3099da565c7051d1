pub mod dictionary;
pub mod processor;
pub mod script;
pub mod translator;
pub mod tutor;

pub use dictionary::{CardParser, SigureDictionary};
pub use processor::JapaneseProcessor;
pub use translator::{GeminiModel, ModelInfo};
pub use tutor::JapaneseTutor;
