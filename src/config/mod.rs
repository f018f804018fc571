pub mod store;
pub mod types;

pub use store::ConfigStore;
pub use types::{Method, ScanConfig, DEFAULT_PROFILE_PATH, DEFAULT_USER_AGENT};
