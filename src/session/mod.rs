pub mod controller;
pub mod events;
pub mod poller;
pub mod state;

pub use controller::{SessionController, StatusOutcome};
pub use events::SessionEvent;
pub use poller::{StatusPoller, POLL_INTERVAL};
pub use state::{progress_estimate, LogEntry, LogLevel, ScanSession, SessionPhase};
