//! 抽出サービスへのアップロード
//!
//! - client: ExtractionService トレイトと reqwest 実装
//! - orchestrator: 1ファイルずつの逐次送信、リトライ、進捗
//! - progress: バッチ進捗
//! - reporter: indicatif による端末表示

mod client;
mod orchestrator;
mod progress;
mod reporter;

pub use client::{AttemptError, ExtractionService, HttpExtractionService, UploadFile};
pub use orchestrator::{
    BatchObserver, BatchReport, FileFailure, UploadFailure, UploadOrchestrator, MAX_ATTEMPTS,
};
pub use progress::BatchProgress;
pub use reporter::ProgressReporter;
