//! バッチ送信のテスト
//!
//! ファイル名ごとに応答を用意したサービスで、リトライ・進捗・ストアへの反映を検証

use ace_contacts::scanner::ImageInfo;
use ace_contacts::upload::{
    AttemptError, BatchObserver, BatchProgress, ExtractionService, FileFailure, UploadFailure,
    UploadFile, UploadOrchestrator,
};
use ace_contacts_common::{ExtractedRecord, ResultStore};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;
use tempfile::{tempdir, TempDir};

type Reply = Result<Vec<ExtractedRecord>, AttemptError>;

/// ファイル名ごとの応答キュー（尽きたら空の成功）
#[derive(Default)]
struct ScriptedService {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedService {
    fn reply(self, file_name: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(file_name.to_string())
            .or_default()
            .push_back(reply);
        self
    }

    fn calls_for(&self, file_name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == file_name).count()
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ExtractionService for ScriptedService {
    async fn extract(&self, file: &UploadFile) -> Reply {
        self.calls.lock().unwrap().push(file.file_name.clone());
        self.replies
            .lock()
            .unwrap()
            .get_mut(&file.file_name)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

fn contact(filename: &str, name: &str, phone: &str) -> ExtractedRecord {
    ExtractedRecord {
        filename: filename.to_string(),
        name: name.to_string(),
        phone: phone.to_string(),
        confidence: 0.9,
    }
}

fn server_error(status: u16) -> Reply {
    Err(AttemptError::Status {
        status,
        status_text: "Service Unavailable".to_string(),
    })
}

fn images(dir: &TempDir, names: &[&str]) -> Vec<ImageInfo> {
    names
        .iter()
        .map(|name| {
            let path = dir.path().join(name);
            std::fs::write(&path, b"fake image bytes").unwrap();
            ImageInfo::from_path(&path)
        })
        .collect()
}

#[tokio::test]
async fn test_all_files_succeed_first_attempt() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["a.png", "b.png", "c.png"]);
    let service = ScriptedService::default()
        .reply("a.png", Ok(vec![contact("a.png", "Ann", "1"), contact("a.png", "Ben", "2")]))
        .reply("b.png", Ok(vec![contact("b.png", "Cid", "3")]))
        .reply("c.png", Ok(vec![contact("c.png", "Dee", "4")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(report.progress.completed(), 3);
    assert_eq!(report.progress.total(), 3);
    assert_eq!(report.progress.percent(), 100);
    assert!(!report.has_failures());
    assert_eq!(report.records_appended, 4);

    let names: Vec<&str> = store.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Ann", "Ben", "Cid", "Dee"]);
    assert_eq!(orchestrator.service().calls(), vec!["a.png", "b.png", "c.png"]);
}

#[tokio::test]
async fn test_server_error_twice_then_success() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["flaky.png"]);
    let service = ScriptedService::default()
        .reply("flaky.png", server_error(503))
        .reply("flaky.png", server_error(503))
        .reply("flaky.png", Ok(vec![contact("flaky.png", "Eve", "5")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("flaky.png"), 3);
    assert_eq!(report.progress.completed(), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().name, "Eve");
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["missing.png", "ok.png"]);
    let service = ScriptedService::default()
        .reply(
            "missing.png",
            Err(AttemptError::Status { status: 404, status_text: "Not Found".into() }),
        )
        .reply("ok.png", Ok(vec![contact("ok.png", "Fay", "6")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("missing.png"), 1);
    assert_eq!(report.progress.completed(), 1);
    assert_eq!(report.progress.percent(), 50);
    assert_eq!(store.len(), 1);
    assert!(store.iter().all(|r| r.filename != "missing.png"));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].file_name, "missing.png");
    assert_eq!(
        report.failures[0].reason,
        UploadFailure::Upload { status: 404, status_text: "Not Found".into() }
    );
}

#[tokio::test]
async fn test_network_errors_exhaust_retries_and_batch_continues() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["offline.png", "next.png"]);
    let mut service = ScriptedService::default();
    for _ in 0..3 {
        service = service.reply("offline.png", Err(AttemptError::Transport("connection refused".into())));
    }
    let service = service.reply("next.png", Ok(vec![contact("next.png", "Gus", "7")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("offline.png"), 3);
    assert_eq!(orchestrator.service().calls_for("next.png"), 1);
    assert_eq!(report.progress.completed(), 1);
    assert!(matches!(report.failures[0].reason, UploadFailure::Network(_)));
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_server_error_exhausted_is_upload_failure() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["down.png"]);
    let service = ScriptedService::default()
        .reply("down.png", server_error(500))
        .reply("down.png", server_error(502))
        .reply("down.png", server_error(503))
        .reply("down.png", Ok(vec![contact("down.png", "never", "0")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("down.png"), 3);
    assert_eq!(report.progress.completed(), 0);
    assert_eq!(report.progress.percent(), 0);
    assert!(matches!(
        report.failures[0].reason,
        UploadFailure::Upload { status: 503, .. }
    ));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_parse_error_is_not_retried() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["garbled.png"]);
    let service = ScriptedService::default()
        .reply("garbled.png", Err(AttemptError::Parse("expected value".into())));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("garbled.png"), 1);
    assert!(matches!(report.failures[0].reason, UploadFailure::ResponseParse(_)));
    assert_eq!(report.progress.completed(), 0);
}

#[tokio::test]
async fn test_request_build_error_is_not_retried() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["odd.png", "next.png"]);
    let service = ScriptedService::default()
        .reply("odd.png", Err(AttemptError::Request("invalid mime".into())))
        .reply("next.png", Ok(vec![]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls_for("odd.png"), 1);
    assert_eq!(report.failures[0].reason, UploadFailure::Request("invalid mime".into()));
    assert_eq!(report.progress.completed(), 1);
}

#[tokio::test]
async fn test_unreadable_file_sends_no_request() {
    let dir = tempdir().unwrap();
    let mut files = images(&dir, &["real.png"]);
    files.insert(0, ImageInfo::from_path(Path::new("/nonexistent/ghost.png")));
    let service = ScriptedService::default()
        .reply("real.png", Ok(vec![contact("real.png", "Hal", "8")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(orchestrator.service().calls(), vec!["real.png"]);
    assert!(matches!(report.failures[0].reason, UploadFailure::FileRead(_)));
    assert_eq!(report.progress.completed(), 1);
    assert_eq!(report.progress.total(), 2);
}

#[tokio::test]
async fn test_empty_results_count_as_completed() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["blank.png"]);
    let service = ScriptedService::default().reply("blank.png", Ok(Vec::new()));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&files, &mut store, &mut ()).await;

    assert_eq!(report.progress.completed(), 1);
    assert_eq!(report.progress.percent(), 100);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_store_accumulates_across_batches() {
    let dir = tempdir().unwrap();
    let first = images(&dir, &["shot.png"]);
    let service = ScriptedService::default()
        .reply("shot.png", Ok(vec![contact("shot.png", "Ivy", "9")]))
        .reply("shot.png", Ok(vec![contact("shot.png", "Ivy", "9")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();

    orchestrator.process_batch(&first, &mut store, &mut ()).await;
    let report = orchestrator.process_batch(&first, &mut store, &mut ()).await;

    // 同名ファイルの再アップロードは2行目として残る
    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0), store.get(1));
    // 進捗はバッチごとに作り直される
    assert_eq!(report.progress.total(), 1);
    assert_eq!(report.progress.completed(), 1);
}

#[derive(Default)]
struct RecordingObserver {
    events: Vec<String>,
}

impl BatchObserver for RecordingObserver {
    fn on_file_started(&mut self, index: usize, file: &ImageInfo, progress: &BatchProgress) {
        self.events
            .push(format!("start {} {} {}", index, file.file_name, progress.completed()));
    }

    fn on_retry(&mut self, file_name: &str, next_attempt: u32, _error: &AttemptError) {
        self.events.push(format!("retry {} {}", file_name, next_attempt));
    }

    fn on_file_completed(&mut self, file: &ImageInfo, records: usize, progress: &BatchProgress) {
        self.events.push(format!(
            "done {} {} {}%",
            file.file_name,
            records,
            progress.percent()
        ));
    }

    fn on_file_failed(&mut self, failure: &FileFailure, progress: &BatchProgress) {
        self.events
            .push(format!("fail {} {}%", failure.file_name, progress.percent()));
    }
}

#[tokio::test]
async fn test_observer_sees_events_in_submission_order() {
    let dir = tempdir().unwrap();
    let files = images(&dir, &["one.png", "two.png", "three.png"]);
    let service = ScriptedService::default()
        .reply("one.png", Ok(vec![contact("one.png", "A", "1")]))
        .reply("two.png", server_error(500))
        .reply("two.png", Err(AttemptError::Status { status: 400, status_text: "Bad Request".into() }))
        .reply("three.png", Ok(vec![contact("three.png", "B", "2"), contact("three.png", "C", "3")]));
    let orchestrator = UploadOrchestrator::new(service);
    let mut store = ResultStore::new();
    let mut observer = RecordingObserver::default();

    let report = orchestrator.process_batch(&files, &mut store, &mut observer).await;

    assert_eq!(
        observer.events,
        vec![
            "start 0 one.png 0",
            "done one.png 1 33%",
            "start 1 two.png 1",
            "retry two.png 2",
            "fail two.png 33%",
            "start 2 three.png 1",
            "done three.png 2 67%",
        ]
    );
    assert_eq!(report.progress.percent(), 67);
    assert_eq!(orchestrator.service().calls_for("two.png"), 2);
}

#[tokio::test]
async fn test_empty_batch() {
    let orchestrator = UploadOrchestrator::new(ScriptedService::default());
    let mut store = ResultStore::new();

    let report = orchestrator.process_batch(&[], &mut store, &mut ()).await;

    assert_eq!(report.progress.total(), 0);
    assert_eq!(report.progress.percent(), 0);
    assert!(orchestrator.service().calls().is_empty());
}
