use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ace")]
#[command(about = "スクリーンショットから連絡先を抽出してExcelに出力", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// 抽出サービスのURL（環境変数 ACE_API_URL・設定ファイルより優先）
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像を抽出サービスへ送信し、連絡先をJSONに保存
    Extract {
        /// 画像ファイルまたはフォルダ（指定順に送信）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力JSONファイル
        #[arg(short, long, default_value = "contacts.json")]
        output: PathBuf,

        /// 既存の出力ファイルに追記する
        #[arg(long)]
        append: bool,
    },

    /// 抽出からExcel出力まで一括実行
    Run {
        /// 画像ファイルまたはフォルダ（指定順に送信）
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// 出力前に対話式で確認・修正する
        #[arg(long)]
        review: bool,
    },

    /// 抽出結果を対話式で確認・修正
    Edit {
        /// 抽出結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力先（省略時は上書き）
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 抽出結果からExcelを生成
    Export {
        /// 抽出結果JSONファイル
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ディレクトリ
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// 抽出サービスの稼働確認
    Health,

    /// 設定を表示/編集
    Config {
        /// 抽出サービスのURLを保存
        #[arg(long)]
        set_api_url: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
