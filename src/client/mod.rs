pub mod http;
pub mod service;
pub mod types;

pub use http::HttpScanService;
pub use service::ScanService;
pub use types::{ScanStatus, SessionSummary, StatusSnapshot, SubmitRequest};
