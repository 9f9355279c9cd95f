//! Excel生成（共通ライブラリ）
//!
//! 連絡先一覧を "Contacts" シート（Name / Phone の2列）に書き出す。
//! filename と confidence はレビュー用のメタデータなので出力しない。

use crate::types::ExtractedRecord;
use rust_xlsxwriter::*;

pub const SHEET_NAME: &str = "Contacts";
pub const HEADERS: [&str; 2] = ["Name", "Phone"];

const NAME_COL_WIDTH: f64 = 32.0;
const PHONE_COL_WIDTH: f64 = 20.0;

/// Excelをバッファに生成
///
/// 値はレコードの `name` / `phone` をそのまま文字列として書き込む
/// （電話番号の先頭0などを数値変換で失わないため）。
pub fn generate_contacts_buffer(records: &[ExtractedRecord]) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    worksheet
        .set_column_width(0, NAME_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;
    worksheet
        .set_column_width(1, PHONE_COL_WIDTH)
        .map_err(|e| format!("列幅設定エラー: {}", e))?;

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("ヘッダー書き込みエラー: {}", e))?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet
            .write_string(row, 0, &record.name)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet
            .write_string(row, 1, &record.phone)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
