use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use dumpctl::client::{
    ScanService, SessionSummary, StatusSnapshot, SubmitRequest,
};
use dumpctl::config::{ConfigStore, ScanConfig};
use dumpctl::errors::DumpctlError;
use dumpctl::results::{table, tree, NodeKind, ResultTree};
use dumpctl::session::{SessionController, StatusOutcome};

/// Scan service stub: counts submissions and hands out sequential ids.
/// Status snapshots are applied to the controller directly, so live status
/// calls from a leftover poller just report a transient failure.
struct ScriptedService {
    submits: AtomicUsize,
}

impl ScriptedService {
    fn new() -> Self {
        Self {
            submits: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ScanService for ScriptedService {
    async fn submit(&self, _request: &SubmitRequest) -> Result<String, DumpctlError> {
        let n = self.submits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("s{}", n))
    }

    async fn status(&self, _scan_id: &str) -> Result<StatusSnapshot, DumpctlError> {
        Err(DumpctlError::Network("status not scripted".into()))
    }

    async fn history(&self) -> Result<Vec<SessionSummary>, DumpctlError> {
        Ok(Vec::new())
    }

    async fn delete_session(&self, _scan_id: &str) -> Result<(), DumpctlError> {
        Ok(())
    }

    fn export_url(&self, scan_id: &str) -> String {
        format!("http://scripted/api/scan/{}/export", scan_id)
    }
}

fn controller(
    service: Arc<ScriptedService>,
    dir: &tempfile::TempDir,
) -> SessionController {
    let (tx, _rx) = mpsc::unbounded_channel();
    let store = ConfigStore::new(dir.path().join("profile.json"));
    SessionController::new(service, store, tx)
}

fn snapshot(json: &str) -> StatusSnapshot {
    serde_json::from_str(json).unwrap()
}

#[tokio::test]
async fn test_full_scan_flow_to_rendered_tree() {
    let service = Arc::new(ScriptedService::new());
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(service.clone(), &dir);

    let config = ScanConfig {
        url: "http://t/x?id=1".into(),
        ..Default::default()
    };
    let scan_id = controller.submit(&config).await.unwrap();
    assert_eq!(scan_id, "s1");

    // First poll: one log line, five percent.
    let running = snapshot(
        r#"{"status": "running", "logs": [{"level": "info", "message": "probing"}]}"#,
    );
    assert_eq!(
        controller.apply_status(&scan_id, &running),
        StatusOutcome::InProgress
    );
    let session = controller.session().unwrap();
    assert_eq!(session.progress, 5);
    assert_eq!(session.logs[0].message, "probing");

    // Terminal poll with the extracted data.
    let completed = snapshot(
        r#"{
            "status": "completed",
            "logs": [
                {"level": "info", "message": "probing"},
                {"level": "success", "message": "done"}
            ],
            "results": {
                "vulnerable": true,
                "data": {"db1": {"users": [{"id": 1, "password": "x"}]}}
            }
        }"#,
    );
    assert_eq!(
        controller.apply_status(&scan_id, &completed),
        StatusOutcome::Completed
    );

    let session = controller.session().unwrap();
    assert_eq!(session.progress, 100);
    let result = session.last_result.as_ref().unwrap();

    let ResultTree::Databases(nodes) = tree::build(result).unwrap() else {
        panic!("expected populated tree");
    };
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].kind, NodeKind::Database);
    assert_eq!(nodes[0].label, "db1");
    assert_eq!(nodes[0].children[0].label, "users");
    assert_eq!(nodes[0].children[0].count, 1);

    // Opening the table flags the password column.
    let view = table::materialize(result, "db1", "users").unwrap();
    let password = view.columns.iter().find(|c| c.name == "password").unwrap();
    assert!(password.sensitive);
    let id = view.columns.iter().find(|c| c.name == "id").unwrap();
    assert!(!id.sensitive);
}

#[tokio::test]
async fn test_duplicate_terminal_snapshot_is_idempotent() {
    let service = Arc::new(ScriptedService::new());
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(service.clone(), &dir);

    let config = ScanConfig {
        url: "http://t/x?id=1".into(),
        ..Default::default()
    };
    let scan_id = controller.submit(&config).await.unwrap();

    let completed = snapshot(
        r#"{
            "status": "completed",
            "logs": [{"level": "success", "message": "done"}],
            "results": {"vulnerable": false}
        }"#,
    );
    controller.apply_status(&scan_id, &completed);
    let first_logs = controller.session().unwrap().logs.clone();
    let first_progress = controller.session().unwrap().progress;

    // Overlapping tick delivered the same response again.
    assert_eq!(
        controller.apply_status(&scan_id, &completed),
        StatusOutcome::Completed
    );
    assert_eq!(controller.session().unwrap().logs, first_logs);
    assert_eq!(controller.session().unwrap().progress, first_progress);
}

#[tokio::test]
async fn test_superseded_scan_cannot_corrupt_successor() {
    let service = Arc::new(ScriptedService::new());
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(service.clone(), &dir);

    let config = ScanConfig {
        url: "http://t/x?id=1".into(),
        ..Default::default()
    };
    let first = controller.submit(&config).await.unwrap();
    let second = controller.submit(&config).await.unwrap();

    // A's late terminal response arrives after B became active.
    let late = snapshot(
        r#"{
            "status": "completed",
            "logs": [{"level": "success", "message": "stale"}],
            "results": {"vulnerable": true}
        }"#,
    );
    assert_eq!(
        controller.apply_status(&first, &late),
        StatusOutcome::Discarded
    );

    let session = controller.session().unwrap();
    assert_eq!(session.id, second);
    assert!(session.logs.is_empty());
    assert!(session.last_result.is_none());
    assert_eq!(session.progress, 0);
}

#[tokio::test]
async fn test_adopted_history_session_renders_cached_tree() {
    let service = Arc::new(ScriptedService::new());
    let dir = tempfile::tempdir().unwrap();
    let mut controller = controller(service.clone(), &dir);

    let summary: SessionSummary = serde_json::from_str(
        r#"{
            "id": 42,
            "timestamp": "2026-08-01T10:00:00",
            "url": "http://t/x?id=1",
            "status": "completed",
            "results": {"vulnerable": true, "data": {"db1": {"users": [{"id": 1}]}}}
        }"#,
    )
    .unwrap();

    controller.adopt_historical(&summary).unwrap();
    assert_eq!(controller.active_scan_id(), Some("42"));

    let result = controller
        .session()
        .and_then(|s| s.last_result.as_ref())
        .unwrap();
    assert!(matches!(
        tree::build(result).unwrap(),
        ResultTree::Databases(_)
    ));
}
