pub mod record;
pub mod vocabulary;

pub use record::{LookupRecord, RecordLayout, RECORD_LAYOUT};
pub use vocabulary::{Token, Vocabulary, PAD_LABEL};
