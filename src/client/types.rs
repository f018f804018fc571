use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::results::ScanResult;
use crate::session::LogEntry;

/// Payload sent to the scan service when submitting a job.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitRequest {
    pub url: String,
    pub param: String,
    pub method: String,
    pub proxy: Option<String>,
    pub cookies: Option<String>,
    pub user_agent: String,
    pub custom_headers: HashMap<String, String>,
    pub tamper_options: Vec<String>,
}

/// Job status as reported by the service. `queued` also covers the legacy
/// `pending` value some deployments emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[serde(alias = "pending")]
    Queued,
    Running,
    Completed,
    Failed,
}

impl ScanStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One status poll response: the full current log list plus, on terminal
/// completion, the result payload.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default, deserialize_with = "opt_id")]
    pub scan_id: Option<String>,
    pub status: ScanStatus,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default)]
    pub results: Option<ScanResult>,
}

/// A prior session as listed by the history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    #[serde(deserialize_with = "id")]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub url: String,
    pub status: ScanStatus,
    #[serde(default)]
    pub results: Option<ScanResult>,
}

// Scan ids are opaque strings on our side; the service historically issued
// integer row ids, so both wire forms are accepted.
fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_terminal_predicate() {
        assert!(ScanStatus::Completed.is_terminal());
        assert!(ScanStatus::Failed.is_terminal());
        assert!(!ScanStatus::Queued.is_terminal());
        assert!(!ScanStatus::Running.is_terminal());
    }

    #[test]
    fn test_status_accepts_pending_alias() {
        let parsed: ScanStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(parsed, ScanStatus::Queued);
    }

    #[test]
    fn test_snapshot_defaults_for_missing_fields() {
        let snapshot: StatusSnapshot = serde_json::from_str(r#"{"status": "running"}"#).unwrap();
        assert_eq!(snapshot.status, ScanStatus::Running);
        assert!(snapshot.logs.is_empty());
        assert!(snapshot.results.is_none());
        assert!(snapshot.scan_id.is_none());
    }

    #[test]
    fn test_summary_accepts_numeric_id() {
        let summary: SessionSummary = serde_json::from_str(
            r#"{"id": 7, "url": "http://t/x", "status": "completed"}"#,
        )
        .unwrap();
        assert_eq!(summary.id, "7");
    }

    #[test]
    fn test_snapshot_parses_full_response() {
        let snapshot: StatusSnapshot = serde_json::from_str(
            r#"{
                "scan_id": "s1",
                "status": "completed",
                "logs": [{"level": "info", "message": "probing"}],
                "results": {"vulnerable": true}
            }"#,
        )
        .unwrap();
        assert_eq!(snapshot.scan_id.as_deref(), Some("s1"));
        assert!(snapshot.status.is_terminal());
        assert_eq!(snapshot.logs.len(), 1);
        assert!(snapshot.results.unwrap().vulnerable);
    }
}
