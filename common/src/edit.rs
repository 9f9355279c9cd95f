//! 編集セッション
//!
//! 開始時にレコードをスクラッチバッファへコピーし、入力はバッファだけを変更する。
//! save で開始時から変わったフィールドだけを ResultStore::update で確定、cancel で破棄。
//! セッションはストアを借用しないため、別の index のセッションを同時に持てる。

use crate::error::{Error, Result};
use crate::store::ResultStore;
use crate::types::{ExtractedRecord, RecordPatch};

#[derive(Debug, Clone)]
pub struct EditSession {
    index: usize,
    original: ExtractedRecord,
    scratch: ExtractedRecord,
}

impl EditSession {
    /// index のレコードで編集を開始
    pub fn begin(store: &ResultStore, index: usize) -> Result<Self> {
        let record = store.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: store.len(),
        })?;
        Ok(Self {
            index,
            original: record.clone(),
            scratch: record.clone(),
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// 編集中の値
    pub fn scratch(&self) -> &ExtractedRecord {
        &self.scratch
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.scratch.name = name.into();
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.scratch.phone = phone.into();
    }

    pub fn set_confidence(&mut self, confidence: f64) {
        self.scratch.confidence = confidence;
    }

    /// 開始時から変更されたフィールドのパッチ
    pub fn changes(&self) -> RecordPatch {
        let (before, after) = (&self.original, &self.scratch);
        RecordPatch {
            filename: (after.filename != before.filename).then(|| after.filename.clone()),
            name: (after.name != before.name).then(|| after.name.clone()),
            phone: (after.phone != before.phone).then(|| after.phone.clone()),
            // NaN 同士も未変更として扱う
            confidence: (after.confidence.to_bits() != before.confidence.to_bits())
                .then_some(after.confidence),
        }
    }

    /// 変更を確定（変更がなければストアに触れない）
    pub fn save(self, store: &mut ResultStore) -> Result<()> {
        let patch = self.changes();
        if patch.is_empty() {
            return Ok(());
        }
        store.update(self.index, patch)
    }

    /// 変更を破棄
    pub fn cancel(self) {}
}
