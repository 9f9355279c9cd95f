//! バッチ送信
//!
//! ファイルは1枚ずつ順番に送信する。i 番目の結果（成功または再試行切れ）が
//! 確定するまで i+1 番目の送信は始めない。失敗したファイルはスキップし、
//! ストアにも進捗にも反映しない。

use super::client::{AttemptError, ExtractionService, UploadFile};
use super::progress::BatchProgress;
use crate::scanner::ImageInfo;
use ace_contacts_common::{ExtractedRecord, ResultStore};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// 1ファイルあたりの最大試行回数（再試行は最大2回）
pub const MAX_ATTEMPTS: u32 = 3;

/// ファイル単位の失敗（バッチは継続する）
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UploadFailure {
    #[error("レスポンスの解析に失敗: {0}")]
    ResponseParse(String),

    #[error("アップロード失敗: HTTP {status} {status_text}")]
    Upload { status: u16, status_text: String },

    #[error("ネットワークエラー: {0}")]
    Network(String),

    #[error("ファイル読み込みエラー: {0}")]
    FileRead(String),

    #[error("リクエスト作成エラー: {0}")]
    Request(String),
}

impl From<AttemptError> for UploadFailure {
    fn from(err: AttemptError) -> Self {
        match err {
            AttemptError::Status { status, status_text } => UploadFailure::Upload { status, status_text },
            AttemptError::Transport(msg) => UploadFailure::Network(msg),
            AttemptError::Parse(msg) => UploadFailure::ResponseParse(msg),
            AttemptError::Request(msg) => UploadFailure::Request(msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub file_name: String,
    pub path: PathBuf,
    pub reason: UploadFailure,
}

/// バッチ終了時の結果
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub progress: BatchProgress,
    pub records_appended: usize,
    pub failures: Vec<FileFailure>,
}

impl BatchReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// 進捗通知の受け口（すべて任意実装）
pub trait BatchObserver {
    fn on_file_started(&mut self, _index: usize, _file: &ImageInfo, _progress: &BatchProgress) {}

    fn on_retry(&mut self, _file_name: &str, _next_attempt: u32, _error: &AttemptError) {}

    fn on_file_completed(&mut self, _file: &ImageInfo, _records: usize, _progress: &BatchProgress) {}

    fn on_file_failed(&mut self, _failure: &FileFailure, _progress: &BatchProgress) {}
}

impl BatchObserver for () {}

pub struct UploadOrchestrator<S> {
    service: S,
}

impl<S: ExtractionService> UploadOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// 1ファイルを送信（5xx・通信エラーは最大 MAX_ATTEMPTS 回まで試行）
    pub async fn submit_file<O>(
        &self,
        file: &UploadFile,
        observer: &mut O,
    ) -> Result<Vec<ExtractedRecord>, UploadFailure>
    where
        O: BatchObserver + ?Sized,
    {
        let mut attempt = 1;
        loop {
            debug!(file = %file.file_name, attempt, "submitting file");
            match self.service.extract(file).await {
                Ok(records) => return Ok(records),
                Err(err) if err.is_retryable() && attempt < MAX_ATTEMPTS => {
                    attempt += 1;
                    warn!(file = %file.file_name, attempt, error = %err, "retrying upload");
                    observer.on_retry(&file.file_name, attempt, &err);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// ファイルを順番に送信し、成功分をストアに追加する
    pub async fn process_batch<O>(
        &self,
        files: &[ImageInfo],
        store: &mut ResultStore,
        observer: &mut O,
    ) -> BatchReport
    where
        O: BatchObserver + ?Sized,
    {
        let mut progress = BatchProgress::new(files.len());
        let mut failures = Vec::new();
        let mut records_appended = 0;

        for (index, image) in files.iter().enumerate() {
            observer.on_file_started(index, image, &progress);

            let outcome = match UploadFile::read(image).await {
                Ok(file) => self.submit_file(&file, &mut *observer).await,
                Err(e) => Err(UploadFailure::FileRead(e.to_string())),
            };

            match outcome {
                Ok(records) => {
                    let count = records.len();
                    store.append(records);
                    records_appended += count;
                    progress.advance();
                    debug!(file = %image.file_name, records = count, progress = %progress, "file completed");
                    observer.on_file_completed(image, count, &progress);
                }
                Err(reason) => {
                    warn!(file = %image.file_name, error = %reason, "file skipped");
                    let failure = FileFailure {
                        file_name: image.file_name.clone(),
                        path: image.path.clone(),
                        reason,
                    };
                    observer.on_file_failed(&failure, &progress);
                    failures.push(failure);
                }
            }
        }

        info!(
            progress = %progress,
            records = records_appended,
            failed = failures.len(),
            "batch finished"
        );

        BatchReport {
            progress,
            records_appended,
            failures,
        }
    }
}
