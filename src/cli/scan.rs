use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tracing::debug;

use crate::client::{HttpScanService, ScanService};
use crate::config::{ConfigStore, ScanConfig};
use crate::errors::DumpctlError;
use crate::render::{self, ScanProgress};
use crate::results::{table, tree};
use crate::session::{SessionController, SessionEvent, StatusOutcome};
use super::commands::ScanArgs;
use super::export::download;

pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<(), DumpctlError> {
    let store = ConfigStore::new(&args.profile);
    let mut config = store.load().await;
    apply_overrides(&mut config, &args)?;

    let service: Arc<dyn ScanService> = Arc::new(HttpScanService::new(&args.api));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(service.clone(), store, tx);

    let scan_id = controller.submit(&config).await?;
    println!(
        "{} Scan {} submitted against {}",
        style("▶").green().bold(),
        style(&scan_id).cyan(),
        style(&config.url).bold()
    );

    let mut progress = ScanProgress::new(quiet);
    let outcome = loop {
        let event = tokio::select! {
            event = rx.recv() => event,
            _ = tokio::signal::ctrl_c() => {
                controller.cancel_active();
                progress.finish("Cancelled");
                println!(
                    "{} Polling stopped; the service keeps running the job",
                    style("✗").yellow()
                );
                return Ok(());
            }
        };
        let Some(event) = event else {
            return Err(DumpctlError::Api(
                "Status channel closed before a terminal status".into(),
            ));
        };
        match event {
            SessionEvent::Snapshot { scan_id, snapshot } => {
                let outcome = controller.apply_status(&scan_id, &snapshot);
                let Some(session) = controller.session() else {
                    continue;
                };
                match outcome {
                    StatusOutcome::Discarded => {}
                    StatusOutcome::InProgress => {
                        progress.apply(session.progress, &session.logs);
                    }
                    StatusOutcome::Completed | StatusOutcome::Failed => {
                        progress.apply(session.progress, &session.logs);
                        break outcome;
                    }
                }
            }
            SessionEvent::PollError { scan_id, error } => {
                debug!(scan_id = %scan_id, error = %error, "Transient poll failure");
                progress.note_transient(&error);
            }
        }
    };

    match outcome {
        StatusOutcome::Completed => {
            progress.finish("Scan completed");
            render_completed(&controller, &service, &args).await
        }
        _ => {
            progress.finish("Scan failed");
            Err(DumpctlError::Api(
                "Scan failed; check the scan logs for details".into(),
            ))
        }
    }
}

async fn render_completed(
    controller: &SessionController,
    service: &Arc<dyn ScanService>,
    args: &ScanArgs,
) -> Result<(), DumpctlError> {
    let Some(result) = controller.session().and_then(|s| s.last_result.as_ref()) else {
        println!("{}", style("Scan completed without a result payload").dim());
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!();
    print!("{}", render::render_summary_header(result));
    print!("{}", render::render_tree(&tree::build(result)?));

    if let Some(target) = &args.open {
        let (database, table_name) = target.split_once('.').ok_or_else(|| {
            DumpctlError::Config(format!("Expected DB.TABLE, got '{}'", target))
        })?;
        let view = table::materialize(result, database, table_name)?;
        println!();
        print!("{}", render::render_table(&view));
    }

    if let Some(output) = &args.export {
        let scan_id = controller
            .active_scan_id()
            .ok_or_else(|| DumpctlError::Api("No active scan to export".into()))?;
        download(&service.export_url(scan_id), output.as_ref()).await?;
        println!(
            "{} Export written to {}",
            style("✓").green(),
            style(output).bold()
        );
    }

    Ok(())
}

fn apply_overrides(config: &mut ScanConfig, args: &ScanArgs) -> Result<(), DumpctlError> {
    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    if let Some(param) = &args.param {
        config.param = param.clone();
    }
    if let Some(method) = &args.method {
        config.method = method.parse()?;
    }
    if let Some(proxy) = &args.proxy {
        config.proxy = Some(proxy.clone());
    }
    if let Some(cookies) = &args.cookies {
        config.cookies = Some(cookies.clone());
    }
    if let Some(user_agent) = &args.user_agent {
        config.user_agent = user_agent.clone();
    }
    if let Some(headers) = &args.headers {
        config.custom_headers = headers.clone();
    }
    if let Some(body) = &args.body {
        config.body = Some(body.clone());
    }
    if !args.tamper.is_empty() {
        config.tamper_options = args.tamper.clone();
    }
    Ok(())
}
