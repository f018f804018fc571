use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{ScanService, ScanStatus, SessionSummary, StatusSnapshot};
use crate::config::{ConfigStore, ScanConfig};
use crate::errors::DumpctlError;
use super::events::SessionEvent;
use super::poller::{StatusPoller, POLL_INTERVAL};
use super::state::{progress_estimate, ScanSession, SessionPhase};

/// Outcome of applying one status observation to the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    /// Snapshot belonged to a superseded or unknown scan id and was dropped.
    Discarded,
    /// Scan still running; log and progress state refreshed.
    InProgress,
    Completed,
    Failed,
}

/// Top-level state machine for the active scan session.
///
/// Owns at most one session and at most one poller at a time; every state
/// transition goes through the methods here. Poll observations arrive as
/// [`SessionEvent`]s on the channel handed to `new` and are applied via
/// [`apply_status`].
pub struct SessionController {
    service: Arc<dyn ScanService>,
    store: ConfigStore,
    events: mpsc::UnboundedSender<SessionEvent>,
    session: Option<ScanSession>,
    poller: Option<StatusPoller>,
}

impl SessionController {
    pub fn new(
        service: Arc<dyn ScanService>,
        store: ConfigStore,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        Self {
            service,
            store,
            events,
            session: None,
            poller: None,
        }
    }

    pub fn session(&self) -> Option<&ScanSession> {
        self.session.as_ref()
    }

    pub fn active_scan_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.id.as_str())
    }

    /// Validate and submit a scan job, then start polling for it.
    ///
    /// Validation failures surface before any network call and leave prior
    /// session state untouched. A submission failure after validation also
    /// creates no session; the previous poller, however, is already stopped
    /// at that point, since at most one poller may ever be live.
    pub async fn submit(&mut self, config: &ScanConfig) -> Result<String, DumpctlError> {
        let request = config.validate()?;

        // Profile is persisted on every submission attempt that passes
        // validation; a write failure is not a reason to block the scan.
        if let Err(e) = self.store.save(config).await {
            warn!(error = %e, "Failed to persist scan profile");
        }

        self.stop_poller();

        info!(url = %config.url, param = %config.param, method = %config.method, "Submitting scan");
        let scan_id = self.service.submit(&request).await?;

        let mut session = ScanSession::new(scan_id.clone());
        session.phase = SessionPhase::Polling;
        self.session = Some(session);
        self.poller = Some(StatusPoller::spawn(
            self.service.clone(),
            scan_id.clone(),
            POLL_INTERVAL,
            self.events.clone(),
        ));

        info!(scan_id = %scan_id, "Scan accepted; polling for status");
        Ok(scan_id)
    }

    /// Stop polling for the active session. Client-side only; the backend
    /// keeps running the job.
    pub fn cancel_active(&mut self) {
        self.stop_poller();
    }

    /// Re-activate a completed session from history using its cached result.
    /// No poller is started and no network request is issued.
    pub fn adopt_historical(&mut self, summary: &SessionSummary) -> Result<(), DumpctlError> {
        let results = match (summary.status, &summary.results) {
            (ScanStatus::Completed, Some(results)) => results.clone(),
            (ScanStatus::Completed, None) => {
                return Err(DumpctlError::Api(format!(
                    "Session {} has no cached results",
                    summary.id
                )))
            }
            (status, _) => {
                return Err(DumpctlError::Api(format!(
                    "Session {} is {}, not completed",
                    summary.id, status
                )))
            }
        };

        let mut session = ScanSession::new(summary.id.clone());
        session.phase = SessionPhase::Completed;
        session.progress = 100;
        session.last_result = Some(results);
        self.session = Some(session);

        info!(scan_id = %summary.id, "Adopted historical session");
        Ok(())
    }

    /// Apply one status observation.
    ///
    /// The snapshot replaces log and progress state wholesale, so duplicate
    /// or reordered observations are harmless. Snapshots tagged with an id
    /// other than the active session's are discarded: the supersession
    /// guard against a stale poller's late responses.
    pub fn apply_status(&mut self, scan_id: &str, snapshot: &StatusSnapshot) -> StatusOutcome {
        let Some(session) = self.session.as_mut() else {
            debug!(scan_id, "No active session; snapshot dropped");
            return StatusOutcome::Discarded;
        };
        if session.id != scan_id {
            debug!(scan_id, active = %session.id, "Snapshot for superseded scan dropped");
            return StatusOutcome::Discarded;
        }
        if session.phase.is_terminal() {
            return match session.phase {
                SessionPhase::Completed => StatusOutcome::Completed,
                _ => StatusOutcome::Failed,
            };
        }

        session.logs = snapshot.logs.clone();
        let terminal = snapshot.status.is_terminal();
        session.progress = progress_estimate(session.logs.len(), terminal);

        let outcome = match snapshot.status {
            ScanStatus::Completed => {
                session.phase = SessionPhase::Completed;
                session.last_result = snapshot.results.clone();
                info!(scan_id, "Scan completed");
                StatusOutcome::Completed
            }
            ScanStatus::Failed => {
                session.phase = SessionPhase::Failed;
                warn!(scan_id, "Scan failed");
                StatusOutcome::Failed
            }
            ScanStatus::Queued | ScanStatus::Running => StatusOutcome::InProgress,
        };

        if terminal {
            self.stop_poller();
        }
        outcome
    }

    fn stop_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            debug!(scan_id = %poller.scan_id(), "Stopping status poller");
            poller.stop();
        }
    }
}
