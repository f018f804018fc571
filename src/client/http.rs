use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::errors::DumpctlError;
use super::service::ScanService;
use super::types::{SessionSummary, StatusSnapshot, SubmitRequest};

/// HTTP client for the scan service REST API.
pub struct HttpScanService {
    client: Client,
    base_url: String,
}

impl HttpScanService {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ScanService for HttpScanService {
    async fn submit(&self, request: &SubmitRequest) -> Result<String, DumpctlError> {
        let resp = self
            .client
            .post(format!("{}/api/scan", self.base_url))
            .json(request)
            .send()
            .await
            .map_err(|e| DumpctlError::Network(format!("Submission request failed: {}", e)))?;

        let status = resp.status();
        let data: Value = resp
            .json()
            .await
            .map_err(|e| DumpctlError::Submission(format!("Malformed submission response: {}", e)))?;

        if let Some(error) = data.get("error") {
            let msg = error.as_str().unwrap_or("Unknown error");
            return Err(DumpctlError::Submission(msg.to_string()));
        }
        if !status.is_success() {
            return Err(DumpctlError::Submission(format!(
                "Scan service returned HTTP {}",
                status
            )));
        }

        let scan_id = match data.get("scan_id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(DumpctlError::Submission(
                    "No scan_id in submission response".into(),
                ))
            }
        };

        debug!(scan_id = %scan_id, "Scan submitted");
        Ok(scan_id)
    }

    async fn status(&self, scan_id: &str) -> Result<StatusSnapshot, DumpctlError> {
        let resp = self
            .client
            .get(format!("{}/api/scan/{}/status", self.base_url, scan_id))
            .send()
            .await
            .map_err(|e| DumpctlError::Network(format!("Status request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DumpctlError::Api(format!(
                "Status query for scan {} returned HTTP {}",
                scan_id,
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| DumpctlError::Api(format!("Malformed status response: {}", e)))
    }

    async fn history(&self) -> Result<Vec<SessionSummary>, DumpctlError> {
        let resp = self
            .client
            .get(format!("{}/api/sessions", self.base_url))
            .send()
            .await
            .map_err(|e| DumpctlError::Network(format!("History request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DumpctlError::Api(format!(
                "History query returned HTTP {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| DumpctlError::Api(format!("Malformed history response: {}", e)))
    }

    async fn delete_session(&self, scan_id: &str) -> Result<(), DumpctlError> {
        let resp = self
            .client
            .delete(format!("{}/api/sessions/{}", self.base_url, scan_id))
            .send()
            .await
            .map_err(|e| DumpctlError::Network(format!("Delete request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DumpctlError::Api(format!(
                "Delete for session {} returned HTTP {}",
                scan_id,
                resp.status()
            )));
        }
        Ok(())
    }

    fn export_url(&self, scan_id: &str) -> String {
        format!("{}/api/scan/{}/export", self.base_url, scan_id)
    }
}
