use async_trait::async_trait;

use crate::errors::DumpctlError;
use super::types::{SessionSummary, StatusSnapshot, SubmitRequest};

/// Boundary to the scan service. The backend runs jobs out-of-band; this
/// trait covers submission, status discovery, session history, and the
/// export target. Everything behind it is opaque to the session core.
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Submit a scan job, returning the server-assigned scan id.
    async fn submit(&self, request: &SubmitRequest) -> Result<String, DumpctlError>;

    /// Fetch the current status snapshot for a job.
    async fn status(&self, scan_id: &str) -> Result<StatusSnapshot, DumpctlError>;

    /// List recent sessions, newest first.
    async fn history(&self) -> Result<Vec<SessionSummary>, DumpctlError>;

    /// Remove a session from the service's history.
    async fn delete_session(&self, scan_id: &str) -> Result<(), DumpctlError>;

    /// Request target for the CSV export download. The response is written
    /// to disk verbatim, never parsed.
    fn export_url(&self, scan_id: &str) -> String;
}
