use std::sync::Arc;

use tracing::debug;

use crate::client::{ScanService, SessionSummary};
use crate::errors::DumpctlError;

/// Read-only listing of prior sessions. Selection hands a summary to
/// [`SessionController::adopt_historical`]; nothing here mutates session
/// data.
///
/// [`SessionController::adopt_historical`]: crate::session::SessionController::adopt_historical
pub struct HistoryPanel {
    service: Arc<dyn ScanService>,
}

impl HistoryPanel {
    pub fn new(service: Arc<dyn ScanService>) -> Self {
        Self { service }
    }

    pub async fn list(&self) -> Result<Vec<SessionSummary>, DumpctlError> {
        let sessions = self.service.history().await?;
        debug!(count = sessions.len(), "Fetched session history");
        Ok(sessions)
    }
}
