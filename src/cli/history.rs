use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;

use crate::client::{HttpScanService, ScanService};
use crate::config::{ConfigStore, DEFAULT_PROFILE_PATH};
use crate::errors::DumpctlError;
use crate::history::HistoryPanel;
use crate::render;
use crate::results::tree;
use crate::session::SessionController;
use super::commands::HistoryArgs;

pub async fn handle_history(args: HistoryArgs) -> Result<(), DumpctlError> {
    let service: Arc<dyn ScanService> = Arc::new(HttpScanService::new(&args.api));

    if let Some(id) = &args.delete {
        service.delete_session(id).await?;
        println!("{} Session {} deleted", style("✓").green(), style(id).cyan());
        return Ok(());
    }

    let panel = HistoryPanel::new(service.clone());
    let sessions = panel.list().await?;

    if let Some(id) = &args.open {
        let summary = sessions
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| DumpctlError::Api(format!("No session with id {}", id)))?;

        let (tx, _rx) = mpsc::unbounded_channel();
        let store = ConfigStore::new(DEFAULT_PROFILE_PATH);
        let mut controller = SessionController::new(service, store, tx);
        controller.adopt_historical(summary)?;

        let Some(result) = controller.session().and_then(|s| s.last_result.as_ref()) else {
            return Err(DumpctlError::Api(format!("Session {} has no results", id)));
        };

        if args.json {
            println!("{}", serde_json::to_string_pretty(result)?);
            return Ok(());
        }
        print!("{}", render::render_summary_header(result));
        print!("{}", render::render_tree(&tree::build(result)?));
        return Ok(());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }
    print!("{}", render::render_history(&sessions));
    Ok(())
}
