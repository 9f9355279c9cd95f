//! 端末向けの進捗表示

use super::client::AttemptError;
use super::orchestrator::{BatchObserver, FileFailure};
use super::progress::BatchProgress;
use crate::scanner::ImageInfo;
use indicatif::{ProgressBar, ProgressStyle};

pub struct ProgressReporter {
    bar: ProgressBar,
    verbose: bool,
}

impl ProgressReporter {
    pub fn new(total: usize, verbose: bool) -> Self {
        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("[{bar:40.cyan/blue}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar.set_message(label(&BatchProgress::new(total)));
        Self { bar, verbose }
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}

fn label(progress: &BatchProgress) -> String {
    format!(
        "Uploading file {} of {}  {}%",
        progress.completed(),
        progress.total(),
        progress.percent()
    )
}

impl BatchObserver for ProgressReporter {
    fn on_file_started(&mut self, _index: usize, file: &ImageInfo, _progress: &BatchProgress) {
        if self.verbose {
            self.bar.println(format!("  送信中: {}", file.file_name));
        }
    }

    fn on_retry(&mut self, file_name: &str, next_attempt: u32, error: &AttemptError) {
        self.bar.println(format!(
            "  ↻ {} を再試行します（{}回目）: {}",
            file_name, next_attempt, error
        ));
    }

    fn on_file_completed(&mut self, file: &ImageInfo, records: usize, progress: &BatchProgress) {
        if self.verbose {
            self.bar.println(format!("  ✔ {}: {}件", file.file_name, records));
        }
        self.bar.set_position(progress.completed() as u64);
        self.bar.set_message(label(progress));
    }

    fn on_file_failed(&mut self, failure: &FileFailure, _progress: &BatchProgress) {
        self.bar.println(format!(
            "  ✖ {} の処理に失敗しました: {}",
            failure.file_name, failure.reason
        ));
    }
}
