//! Lore corpus, validation, and enrichment audit records

pub mod index;
pub mod record;
pub mod validator;

pub use index::LoreIndex;
pub use record::{LoreRecord, LoreRecordType, RecordTarget};
pub use validator::LoreValidator;
