use crate::client::StatusSnapshot;

/// Observations streamed from the status poller to whoever drives the
/// session. Every event carries the scan id of the poller that produced it
/// so late arrivals from a superseded poller can be told apart and dropped.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A status response arrived for the tagged scan.
    Snapshot {
        scan_id: String,
        snapshot: StatusSnapshot,
    },
    /// A status request failed; polling continues on the next tick.
    PollError { scan_id: String, error: String },
}
