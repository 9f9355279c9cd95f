use ace_contacts::{cli, config, editor, error, export, scanner, upload};
use ace_contacts_common::ResultStore;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use error::{AceError, Result};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use upload::{BatchReport, HttpExtractionService, ProgressReporter, UploadOrchestrator};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Extract { inputs, output, append } => {
            println!("📇 ACE - 連絡先抽出\n");

            let images = collect_images(&inputs)?;

            let mut store = if append && output.exists() {
                let store = load_store(&output)?;
                println!("- 既存の{}件に追記します: {}", store.len(), output.display());
                store
            } else {
                ResultStore::new()
            };

            let service = build_service(&config, cli.api_url.as_deref())?;
            let report = run_batch(service, &images, &mut store, cli.verbose).await;
            print_summary(&report, &store);

            let json = serde_json::to_string_pretty(&store)?;
            std::fs::write(&output, json)?;
            println!("✔ 結果を保存: {}", output.display());
        }

        Commands::Run { inputs, output, review } => {
            println!("🚀 ACE - 一括処理\n");

            let images = collect_images(&inputs)?;

            let service = build_service(&config, cli.api_url.as_deref())?;
            let mut store = ResultStore::new();
            let report = run_batch(service, &images, &mut store, cli.verbose).await;
            print_summary(&report, &store);

            if review {
                println!("\n[確認] 抽出結果を確認・修正");
                let saved = editor::run_interactive_review(&mut store)?;
                println!("✔ {}件を修正\n", saved);
            }

            write_export(&store, &output)?;
            println!("\n✅ 完了");
        }

        Commands::Edit { input, output } => {
            println!("✏️  ACE - 確認・修正\n");
            editor::edit_file(&input, output.as_deref())?;
        }

        Commands::Export { input, output } => {
            println!("📄 ACE - エクスポート\n");
            let store = load_store(&input)?;
            write_export(&store, &output)?;
        }

        Commands::Health => {
            let service = build_service(&config, cli.api_url.as_deref())?;
            service.health().await?;
            println!("✔ 抽出サービス稼働中: {}", service.base_url());
        }

        Commands::Config { set_api_url, show } => {
            let mut config = config;

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ 抽出サービスのURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  API URL: {}", config.resolve_api_url(cli.api_url.as_deref()));
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                if let Ok(path) = Config::config_path() {
                    println!("  設定ファイル: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,ace_contacts={},ace_contacts_common={}",
            level, level
        ))
    });

    // 進捗バーと混ざらないように stderr へ
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

fn collect_images(inputs: &[std::path::PathBuf]) -> Result<Vec<scanner::ImageInfo>> {
    println!("[1/3] 画像を確認中...");
    let images = scanner::collect_inputs(inputs)?;
    if images.is_empty() {
        let joined = inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(AceError::NoImagesFound(joined));
    }
    println!("✔ {}枚の画像を検出\n", images.len());
    Ok(images)
}

fn build_service(config: &Config, api_url: Option<&str>) -> Result<HttpExtractionService> {
    let url = config.resolve_api_url(api_url);
    HttpExtractionService::new(url, Duration::from_secs(config.timeout_seconds))
}

async fn run_batch(
    service: HttpExtractionService,
    images: &[scanner::ImageInfo],
    store: &mut ResultStore,
    verbose: bool,
) -> BatchReport {
    println!("[2/3] 抽出サービスへ送信中... ({})", service.base_url());
    let orchestrator = UploadOrchestrator::new(service);
    let mut reporter = ProgressReporter::new(images.len(), verbose);
    let report = orchestrator.process_batch(images, store, &mut reporter).await;
    reporter.finish();
    report
}

fn print_summary(report: &BatchReport, store: &ResultStore) {
    let mark = if report.progress.is_complete() { "✔" } else { "⚠" };
    println!(
        "{} 送信完了: {}/{}ファイル成功 ({}%)、{}件追加（合計{}件）",
        mark,
        report.progress.completed(),
        report.progress.total(),
        report.progress.percent(),
        report.records_appended,
        store.len()
    );
    if report.has_failures() {
        println!("⚠ 失敗したファイル:");
        for failure in &report.failures {
            println!("  - {}: {}", failure.file_name, failure.reason);
        }
    }
    println!();
}

fn load_store(path: &Path) -> Result<ResultStore> {
    if !path.exists() {
        return Err(AceError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_export(store: &ResultStore, output_dir: &Path) -> Result<()> {
    println!("[3/3] Excelを生成中...");
    match export::export_contacts(store, output_dir, export::today())? {
        Some(path) => println!("✔ Excel出力: {} ({}件)", path.display(), store.len()),
        None => println!("- 出力する連絡先がありません（ファイルは作成しません）"),
    }
    Ok(())
}
