//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Record index {index} out of range (store has {len} records)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Confidence must be within [0, 1], got {0}")]
    InvalidConfidence(f64),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
