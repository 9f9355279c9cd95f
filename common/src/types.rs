//! 抽出結果の型定義
//!
//! - ExtractedRecord: 抽出サービスが返す連絡先1件
//! - RecordPatch: 部分更新（Noneのフィールドは変更しない）
//! - ExtractResponse: `POST /extract` のレスポンスボディ

use serde::{Deserialize, Deserializer, Serialize};

/// 名前が取れなかったときの表示用プレースホルダ
pub const UNKNOWN_NAME: &str = "Unknown";

/// 抽出された連絡先レコード
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedRecord {
    /// 元画像のファイル名（一意ではない）
    pub filename: String,
    pub name: String,
    /// 抽出された電話番号（未検証の生テキスト）
    pub phone: String,
    /// サービスが報告した信頼度 [0, 1]
    pub confidence: f64,
}

impl ExtractedRecord {
    /// 表示用の名前（空なら "Unknown"）
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            UNKNOWN_NAME
        } else {
            &self.name
        }
    }

    /// 名前が未取得（空または "Unknown"）か
    pub fn has_placeholder_name(&self) -> bool {
        self.name.is_empty() || self.name == UNKNOWN_NAME
    }

    /// 信頼度をパーセント表示用に丸める
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round().clamp(0.0, 100.0) as u32
    }

    pub fn confidence_level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_confidence(self.confidence)
    }

    /// パッチを適用（存在するフィールドのみ上書き）
    pub(crate) fn apply(&mut self, patch: RecordPatch) {
        if let Some(filename) = patch.filename {
            self.filename = filename;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(confidence) = patch.confidence {
            self.confidence = confidence;
        }
    }
}

/// 信頼度バッジの区分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.8 {
            ConfidenceLevel::High
        } else if confidence > 0.5 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        }
    }
}

/// レコードの部分更新
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub filename: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub confidence: Option<f64>,
}

impl RecordPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn phone(phone: impl Into<String>) -> Self {
        Self {
            phone: Some(phone.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.filename.is_none()
            && self.name.is_none()
            && self.phone.is_none()
            && self.confidence.is_none()
    }
}

/// `POST /extract` の成功レスポンス
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// 欠落・null は空配列として扱う
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<ExtractedRecord>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
