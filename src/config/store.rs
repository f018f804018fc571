use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::DumpctlError;
use super::types::ScanConfig;

/// Durable slot for the last-used scan profile.
///
/// Loading never fails: an absent or corrupted file falls back to defaults
/// field by field, so one bad entry does not discard the rest of the
/// profile.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> ScanConfig {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No stored profile; using defaults");
                return ScanConfig::default();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => from_value(&value),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Stored profile is corrupt; using defaults");
                ScanConfig::default()
            }
        }
    }

    pub async fn save(&self, config: &ScanConfig) -> Result<(), DumpctlError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(config)?;
        tokio::fs::write(&self.path, json).await?;
        debug!(path = %self.path.display(), "Scan profile saved");
        Ok(())
    }
}

fn from_value(value: &Value) -> ScanConfig {
    let defaults = ScanConfig::default();
    ScanConfig {
        url: string_field(value, "url").unwrap_or(defaults.url),
        param: string_field(value, "param").unwrap_or(defaults.param),
        method: field(value, "method").unwrap_or(defaults.method),
        proxy: string_field(value, "proxy"),
        cookies: string_field(value, "cookies"),
        user_agent: string_field(value, "user_agent").unwrap_or(defaults.user_agent),
        custom_headers: string_field(value, "custom_headers").unwrap_or(defaults.custom_headers),
        body: string_field(value, "body"),
        tamper_options: field(value, "tamper_options").unwrap_or(defaults.tamper_options),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

fn field<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Option<T> {
    serde_json::from_value(value.get(key)?.clone()).ok()
}
