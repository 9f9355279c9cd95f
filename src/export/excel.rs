//! Excel出力（CLI版）
//!
//! 共通ライブラリでバッファを生成し、`ACE_Contacts_<YYYY-MM-DD>.xlsx` として保存する。

use crate::error::{AceError, Result};
use ace_contacts_common::export::excel_core::generate_contacts_buffer;
use ace_contacts_common::ResultStore;
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::info;

/// 出力ファイル名の日付（UTC）
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("ACE_Contacts_{}.xlsx", date.format("%Y-%m-%d"))
}

/// ストアの内容をExcelに書き出す
///
/// ストアが空のときはファイルを作らず `None` を返す。ストアは変更しない。
pub fn export_contacts(
    store: &ResultStore,
    output_dir: &Path,
    date: NaiveDate,
) -> Result<Option<PathBuf>> {
    if store.is_empty() {
        return Ok(None);
    }

    let buffer = generate_contacts_buffer(store.records()).map_err(AceError::ExcelGeneration)?;

    std::fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join(export_file_name(date));
    std::fs::write(&output_path, buffer)?;

    info!(path = %output_path.display(), rows = store.len(), "contacts exported");
    Ok(Some(output_path))
}
