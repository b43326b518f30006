#![forbid(unsafe_code)]

pub mod entity_store;
pub mod error;
pub mod file_port;
pub mod fixtures;
pub mod port;

pub use entity_store::{EditOutcome, FieldSource, HydrationReport, PersistedEntityStore};
pub use error::StorageError;
pub use file_port::FileKeyValue;
pub use port::{InMemoryKeyValue, KeyValuePort};
