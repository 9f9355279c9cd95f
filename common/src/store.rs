//! ResultStore: 抽出レコードの順序付きコレクション
//!
//! 追加（append）と位置指定の部分更新（update）のみを許可する。
//! レコードの識別子は位置（index）だけなので、削除・並び替えは提供しない。

use crate::error::{Error, Result};
use crate::types::{ExtractedRecord, RecordPatch};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultStore {
    records: Vec<ExtractedRecord>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 末尾に追加（重複除去・置き換えはしない）
    pub fn append<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = ExtractedRecord>,
    {
        self.records.extend(records);
    }

    /// index のレコードにパッチを適用
    ///
    /// 範囲外・不正な信頼度の場合はストアを変更せずにエラーを返す。
    pub fn update(&mut self, index: usize, patch: RecordPatch) -> Result<()> {
        let len = self.records.len();
        if let Some(confidence) = patch.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(Error::InvalidConfidence(confidence));
            }
        }
        let record = self
            .records
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        record.apply(patch);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&ExtractedRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[ExtractedRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtractedRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<ExtractedRecord>> for ResultStore {
    fn from(records: Vec<ExtractedRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = &'a ExtractedRecord;
    type IntoIter = std::slice::Iter<'a, ExtractedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
