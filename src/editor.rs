//! 対話式レビュー・修正モジュール
//!
//! 一度に編集するレコードは1件。入力は EditSession のスクラッチバッファに入り、
//! 保存したときだけ ResultStore::update で反映される。

use crate::error::{AceError, Result};
use ace_contacts_common::{EditSession, ExtractedRecord, ResultStore};
use dialoguer::{Confirm, Input};
use std::path::Path;
use tracing::warn;

/// 対話アクション
#[derive(Debug, PartialEq)]
pub enum ReviewAction {
    /// 指定番号（0始まり）のレコードを編集
    Edit(usize),
    /// 一覧を再表示
    List,
    /// 終了
    Quit,
    /// 不正な入力
    Invalid(String),
}

/// 一覧の1行
pub fn format_record_row(index: usize, record: &ExtractedRecord) -> String {
    let phone = if record.phone.is_empty() { "-" } else { record.phone.as_str() };
    format!(
        "[{}] {} | {} | {} | {}% ({})",
        index + 1,
        record.filename,
        record.display_name(),
        phone,
        record.confidence_percent(),
        record.confidence_level().as_str()
    )
}

/// 入力を解釈（番号は1始まり）
pub fn parse_review_input(input: &str, len: usize) -> ReviewAction {
    let trimmed = input.trim();
    match trimmed {
        "q" | "Q" => ReviewAction::Quit,
        "" | "l" | "L" => ReviewAction::List,
        _ => match trimmed.parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => ReviewAction::Edit(n - 1),
            Ok(n) => ReviewAction::Invalid(format!("1〜{} の番号を入力してください: {}", len, n)),
            Err(_) => ReviewAction::Invalid(format!("不明な入力です: {}", trimmed)),
        },
    }
}

/// 名前が取れていないレコード数
fn count_placeholder_names(store: &ResultStore) -> usize {
    store.iter().filter(|r| r.has_placeholder_name()).count()
}

fn print_records(store: &ResultStore) {
    println!("📇 抽出された連絡先: {}件", store.len());
    let unnamed = count_placeholder_names(store);
    if unnamed > 0 {
        println!("⚠ 名前未取得: {}件（番号を選んで修正できます）", unnamed);
    }
    println!("---");
    for (i, record) in store.iter().enumerate() {
        println!("{}", format_record_row(i, record));
    }
    println!("---");
}

/// 対話式でレコードを確認・修正する（保存した件数を返す）
pub fn run_interactive_review(store: &mut ResultStore) -> Result<usize> {
    if store.is_empty() {
        println!("連絡先がまだありません。画像をアップロードしてください");
        return Ok(0);
    }

    print_records(store);
    println!("操作: [番号]編集 [l]一覧 [q]終了\n");

    let mut saved = 0;

    loop {
        let input: String = Input::new()
            .with_prompt("編集する番号")
            .allow_empty(true)
            .interact_text()
            .map_err(|e| AceError::CliExecution(e.to_string()))?;

        match parse_review_input(&input, store.len()) {
            ReviewAction::Edit(index) => {
                let session = EditSession::begin(store, index)?;
                if edit_record(session, store)? {
                    saved += 1;
                }
            }
            ReviewAction::List => print_records(store),
            ReviewAction::Quit => break,
            ReviewAction::Invalid(msg) => println!("  {}", msg),
        }
    }

    Ok(saved)
}

/// 1件を編集（保存したら true）
fn edit_record(mut session: EditSession, store: &mut ResultStore) -> Result<bool> {
    println!("{}", format_record_row(session.index(), session.scratch()));

    let name: String = Input::new()
        .with_prompt("  名前")
        .with_initial_text(session.scratch().name.clone())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AceError::CliExecution(e.to_string()))?;
    session.set_name(name.trim());

    let phone: String = Input::new()
        .with_prompt("  電話番号")
        .with_initial_text(session.scratch().phone.clone())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| AceError::CliExecution(e.to_string()))?;
    session.set_phone(phone.trim());

    let confirmed = Confirm::new()
        .with_prompt("  保存しますか?")
        .default(true)
        .interact()
        .map_err(|e| AceError::CliExecution(e.to_string()))?;

    if confirmed {
        Ok(commit_session(session, store))
    } else {
        session.cancel();
        println!("  → キャンセル\n");
        Ok(false)
    }
}

/// 編集を確定（失敗しても他の編集は残し、レビューを続ける）
fn commit_session(session: EditSession, store: &mut ResultStore) -> bool {
    let index = session.index();
    match session.save(store) {
        Ok(()) => {
            if let Some(record) = store.get(index) {
                println!("  → {}\n", format_record_row(index, record));
            }
            true
        }
        Err(e) => {
            warn!(index, error = %e, "edit not saved");
            println!("  ✖ 保存できませんでした: {}\n", e);
            false
        }
    }
}

/// JSONファイルを読み込んでレビューし、保存する
pub fn edit_file(input_path: &Path, output_path: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(input_path)?;
    let mut store: ResultStore = serde_json::from_str(&content)?;

    let saved = run_interactive_review(&mut store)?;

    let output = output_path.unwrap_or(input_path);
    let json = serde_json::to_string_pretty(&store)?;
    std::fs::write(output, json)?;

    println!("\n✓ {}件を修正して保存しました: {}", saved, output.display());

    Ok(())
}
