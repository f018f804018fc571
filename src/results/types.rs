use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result payload produced by the scan engine for one terminal job.
///
/// `data` nests database → table → rows, where each row maps column name to
/// a scalar. Key order is the engine's emission order and is preserved
/// through deserialization. `data` keys, when present, are a subset of
/// `tables` keys; rows within one table are assumed to share a column set
/// but that is not guaranteed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(default)]
    pub vulnerable: bool,
    #[serde(default)]
    pub dbms: Option<String>,
    #[serde(default)]
    pub current_db: Option<String>,
    #[serde(default)]
    pub waf_detected: Option<String>,
    #[serde(default)]
    pub databases: Option<Vec<String>>,
    #[serde(default)]
    pub tables: Option<Map<String, Value>>,
    #[serde(default)]
    pub columns: Option<Map<String, Value>>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}
