pub mod dictionary;
pub mod error;
pub mod preprocess;
pub mod store;

pub use dictionary::{Dictionary, DictionaryMetadata};
pub use error::{LookupError, ScrapeError, StoreError};
pub use store::{LinkStatus, StorageMode, StoreStatus, WordStore};
