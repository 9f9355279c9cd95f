//! ACE Common Library
//!
//! 抽出レコードの型、ResultStore、編集セッション、Excel出力コア

pub mod types;
pub mod error;
pub mod store;
pub mod edit;
pub mod export;

pub use types::{ConfidenceLevel, ExtractResponse, ExtractedRecord, RecordPatch, UNKNOWN_NAME};
pub use error::{Error, Result};
pub use store::ResultStore;
pub use edit::EditSession;
