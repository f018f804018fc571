use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::timeout;

use dumpctl::client::{ScanService, SessionSummary, StatusSnapshot, SubmitRequest};
use dumpctl::errors::DumpctlError;
use dumpctl::session::{SessionEvent, StatusPoller};

const TICK: Duration = Duration::from_millis(10);
const WAIT: Duration = Duration::from_secs(5);

/// Replays scripted status responses; once the script runs dry it reports
/// the scan as still running.
struct ReplayService {
    responses: Mutex<VecDeque<Result<StatusSnapshot, DumpctlError>>>,
}

impl ReplayService {
    fn new(responses: Vec<Result<StatusSnapshot, DumpctlError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

fn snapshot(json: &str) -> StatusSnapshot {
    serde_json::from_str(json).unwrap()
}

#[async_trait]
impl ScanService for ReplayService {
    async fn submit(&self, _request: &SubmitRequest) -> Result<String, DumpctlError> {
        Ok("s1".into())
    }

    async fn status(&self, _scan_id: &str) -> Result<StatusSnapshot, DumpctlError> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(snapshot(r#"{"status": "running"}"#)))
    }

    async fn history(&self) -> Result<Vec<SessionSummary>, DumpctlError> {
        Ok(Vec::new())
    }

    async fn delete_session(&self, _scan_id: &str) -> Result<(), DumpctlError> {
        Ok(())
    }

    fn export_url(&self, scan_id: &str) -> String {
        format!("http://replay/api/scan/{}/export", scan_id)
    }
}

async fn wait_until_finished(poller: &StatusPoller) {
    timeout(WAIT, async {
        while !poller.is_finished() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("poller did not finish in time");
}

#[tokio::test]
async fn test_poller_survives_transient_failures_until_terminal() {
    let service = Arc::new(ReplayService::new(vec![
        Err(DumpctlError::Network("connection refused".into())),
        Ok(snapshot(
            r#"{"status": "running", "logs": [{"level": "info", "message": "probing"}]}"#,
        )),
        Ok(snapshot(r#"{"status": "completed", "results": {"vulnerable": false}}"#)),
    ]));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = StatusPoller::spawn(service, "s1".into(), TICK, tx);

    let first = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(matches!(first, SessionEvent::PollError { ref scan_id, .. } if scan_id == "s1"));

    let second = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    match second {
        SessionEvent::Snapshot { scan_id, snapshot } => {
            assert_eq!(scan_id, "s1");
            assert!(!snapshot.status.is_terminal());
        }
        other => panic!("expected snapshot, got {:?}", other),
    }

    let third = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    match third {
        SessionEvent::Snapshot { snapshot, .. } => assert!(snapshot.status.is_terminal()),
        other => panic!("expected terminal snapshot, got {:?}", other),
    }

    // Terminal status ends the task on its own.
    wait_until_finished(&poller).await;
}

#[tokio::test]
async fn test_stop_halts_polling_without_terminal_status() {
    let service = Arc::new(ReplayService::new(Vec::new()));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = StatusPoller::spawn(service, "s1".into(), TICK, tx);

    // At least one running snapshot arrives, then we stop client-side.
    let event = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    assert!(matches!(event, SessionEvent::Snapshot { .. }));

    poller.stop();
    wait_until_finished(&poller).await;
}

#[tokio::test]
async fn test_failed_status_is_terminal_for_the_poller() {
    let service = Arc::new(ReplayService::new(vec![Ok(snapshot(
        r#"{"status": "failed", "logs": [{"level": "error", "message": "engine crashed"}]}"#,
    ))]));

    let (tx, mut rx) = mpsc::unbounded_channel();
    let poller = StatusPoller::spawn(service, "s1".into(), TICK, tx);

    let event = timeout(WAIT, rx.recv()).await.unwrap().unwrap();
    match event {
        SessionEvent::Snapshot { snapshot, .. } => {
            assert!(snapshot.status.is_terminal());
            assert!(snapshot.results.is_none());
        }
        other => panic!("expected snapshot, got {:?}", other),
    }

    wait_until_finished(&poller).await;
}
