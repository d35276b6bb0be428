pub mod database;
pub mod memory;
pub mod metrics;
pub mod prompt;
pub mod providers;
pub mod remedy;

pub use database::{PgRecordStore, RecordStore, StoreError};
pub use memory::InMemoryRecordStore;
pub use prompt::build_summary_prompt;
pub use remedy::{RemedyError, RemedyService, MAX_SPEECH_CHARS};
