use std::path::Path;

use console::style;
use tracing::info;

use crate::client::{HttpScanService, ScanService};
use crate::errors::DumpctlError;
use super::commands::ExportArgs;

pub async fn handle_export(args: ExportArgs) -> Result<(), DumpctlError> {
    let service = HttpScanService::new(&args.api);
    download(&service.export_url(&args.scan_id), args.output.as_ref()).await?;
    println!(
        "{} Export written to {}",
        style("✓").green(),
        style(&args.output).bold()
    );
    Ok(())
}

/// Fetch an export target and write the response body to disk verbatim.
pub async fn download(url: &str, output: &Path) -> Result<(), DumpctlError> {
    let resp = reqwest::get(url)
        .await
        .map_err(|e| DumpctlError::Network(format!("Export request failed: {}", e)))?;

    if !resp.status().is_success() {
        return Err(DumpctlError::Api(format!(
            "Export returned HTTP {}",
            resp.status()
        )));
    }

    let bytes = resp
        .bytes()
        .await
        .map_err(|e| DumpctlError::Network(format!("Export download failed: {}", e)))?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(output, &bytes).await?;
    info!(path = %output.display(), bytes = bytes.len(), "Export saved");
    Ok(())
}
