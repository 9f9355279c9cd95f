//! 抽出サービス連携
//!
//! `POST {api_url}/extract` に multipart の `files` フィールドで画像を1枚送る。
//! 1回の試行の結果だけを返し、リトライ判断は orchestrator が行う。

use crate::error::{AceError, Result};
use crate::scanner::ImageInfo;
use ace_contacts_common::{ExtractResponse, ExtractedRecord};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 送信する画像1枚
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub async fn read(image: &ImageInfo) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(&image.path).await?;
        Ok(Self {
            file_name: image.file_name.clone(),
            mime_type: image.mime_type().to_string(),
            bytes,
        })
    }
}

/// 1回の送信試行の失敗
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AttemptError {
    #[error("HTTP {status} {status_text}")]
    Status { status: u16, status_text: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid response body: {0}")]
    Parse(String),

    /// 送信前のリクエスト組み立てに失敗
    #[error("invalid request: {0}")]
    Request(String),
}

impl AttemptError {
    /// 5xx と通信エラーは一時的な失敗として再試行する
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptError::Status { status, .. } => *status >= 500,
            AttemptError::Transport(_) => true,
            AttemptError::Parse(_) | AttemptError::Request(_) => false,
        }
    }
}

#[async_trait]
pub trait ExtractionService: Send + Sync {
    /// 画像1枚を送信し、抽出されたレコードを返す
    async fn extract(&self, file: &UploadFile) -> std::result::Result<Vec<ExtractedRecord>, AttemptError>;
}

/// reqwest による ExtractionService 実装
#[derive(Debug, Clone)]
pub struct HttpExtractionService {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
}

impl HttpExtractionService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AceError::HttpClient(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn extract_url(&self) -> String {
        format!("{}/extract", self.base_url)
    }

    /// `GET /health` でサービスの稼働を確認
    pub async fn health(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AceError::ServiceUnavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AceError::ServiceUnavailable(format!("{}: HTTP {}", url, status)));
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| AceError::ServiceUnavailable(format!("{}: {}", url, e)))?;
        if health.status != "ok" {
            return Err(AceError::ServiceUnavailable(format!(
                "{}: status={}",
                url, health.status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ExtractionService for HttpExtractionService {
    async fn extract(&self, file: &UploadFile) -> std::result::Result<Vec<ExtractedRecord>, AttemptError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| AttemptError::Request(e.to_string()))?;
        let form = Form::new().part("files", part);

        let response = self
            .client
            .post(self.extract_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        debug!(file = %file.file_name, status = status.as_u16(), "extract response");
        if !status.is_success() {
            return Err(AttemptError::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;
        let parsed: ExtractResponse =
            serde_json::from_str(&body).map_err(|e| AttemptError::Parse(e.to_string()))?;

        Ok(parsed.results)
    }
}
