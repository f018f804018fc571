use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::ScanService;
use super::events::SessionEvent;

/// Nominal tick interval between status requests.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Cancellable repeating status fetch for one scan id.
///
/// One request per tick, first tick immediate. The task stops itself on a
/// terminal status; `stop()` (or dropping the handle) stops it from the
/// outside. A failed request is logged and the next tick proceeds as
/// scheduled: transient faults never end polling.
pub struct StatusPoller {
    scan_id: String,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl StatusPoller {
    pub fn spawn(
        service: Arc<dyn ScanService>,
        scan_id: String,
        interval: Duration,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();
        let task_id = scan_id.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!(scan_id = %task_id, "Poller stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        match service.status(&task_id).await {
                            Ok(snapshot) => {
                                let terminal = snapshot.status.is_terminal();
                                let _ = events.send(SessionEvent::Snapshot {
                                    scan_id: task_id.clone(),
                                    snapshot,
                                });
                                if terminal {
                                    debug!(scan_id = %task_id, "Terminal status observed; polling ends");
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!(scan_id = %task_id, error = %e, "Status poll failed; retrying on next tick");
                                let _ = events.send(SessionEvent::PollError {
                                    scan_id: task_id.clone(),
                                    error: e.to_string(),
                                });
                            }
                        }
                    }
                }
            }
        });

        Self {
            scan_id,
            cancel,
            handle,
        }
    }

    pub fn scan_id(&self) -> &str {
        &self.scan_id
    }

    /// Client-side stop only; no cancellation protocol exists at the wire
    /// level, so the service keeps running the job.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
