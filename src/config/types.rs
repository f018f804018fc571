use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::client::SubmitRequest;
use crate::errors::DumpctlError;

/// User-Agent the scan engine falls back to when none is configured.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default location of the persisted scan profile, relative to the working
/// directory.
pub const DEFAULT_PROFILE_PATH: &str = ".dumpctl/profile.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = DumpctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(DumpctlError::Config(format!("Invalid method: {}", other))),
        }
    }
}

/// One scan job configuration as entered by the user and persisted between
/// runs.
///
/// `custom_headers` holds the raw JSON text the user supplied; it is parsed
/// only at submission time so a stored profile can round-trip whatever was
/// typed. `body` is kept for POST scans but never transmitted; the service
/// derives the request from `url`, `param`, and `method`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub url: String,
    pub param: String,
    pub method: Method,
    pub proxy: Option<String>,
    pub cookies: Option<String>,
    pub user_agent: String,
    pub custom_headers: String,
    pub body: Option<String>,
    pub tamper_options: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            param: "id".to_string(),
            method: Method::Get,
            proxy: None,
            cookies: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            custom_headers: "{}".to_string(),
            body: None,
            tamper_options: Vec::new(),
        }
    }
}

impl ScanConfig {
    /// Parse the raw custom-headers text into a header map. Empty text is an
    /// empty map; anything else must be a JSON object of string values.
    pub fn parse_custom_headers(&self) -> Result<HashMap<String, String>, DumpctlError> {
        let raw = self.custom_headers.trim();
        if raw.is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(raw).map_err(|e| {
            DumpctlError::Validation(format!("Invalid JSON in custom headers: {}", e))
        })
    }

    /// Validate the configuration and build the wire payload. Fails before
    /// any network traffic on an empty URL or unparseable headers.
    pub fn validate(&self) -> Result<SubmitRequest, DumpctlError> {
        if self.url.trim().is_empty() {
            return Err(DumpctlError::Validation("URL is required".into()));
        }
        let custom_headers = self.parse_custom_headers()?;

        Ok(SubmitRequest {
            url: self.url.clone(),
            param: self.param.clone(),
            method: self.method.as_str().to_string(),
            proxy: self.proxy.clone(),
            cookies: self.cookies.clone(),
            user_agent: self.user_agent.clone(),
            custom_headers,
            tamper_options: self.tamper_options.clone(),
        })
    }
}
