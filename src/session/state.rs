use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::results::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

/// One engine log line. The log list is append-only on the service side;
/// clients replace their copy wholesale with each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Submitting,
    Polling,
    Completed,
    Failed,
}

impl SessionPhase {
    /// Completed and Failed are absorbing: once reached, the session is
    /// read-only.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One user-initiated scan attempt under a server-assigned id.
#[derive(Debug, Clone)]
pub struct ScanSession {
    pub id: String,
    pub submitted_at: DateTime<Utc>,
    pub phase: SessionPhase,
    pub progress: u8,
    pub logs: Vec<LogEntry>,
    pub last_result: Option<ScanResult>,
}

impl ScanSession {
    pub fn new(id: String) -> Self {
        Self {
            id,
            submitted_at: Utc::now(),
            phase: SessionPhase::Submitting,
            progress: 0,
            logs: Vec::new(),
            last_result: None,
        }
    }
}

/// Progress estimate derived from log volume; the service exposes no
/// dedicated progress signal. Five points per log line, capped at 90 until
/// a terminal status lands.
pub fn progress_estimate(log_count: usize, terminal: bool) -> u8 {
    if terminal {
        100
    } else {
        (log_count * 5).min(90) as u8
    }
}
