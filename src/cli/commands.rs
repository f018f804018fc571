use clap::{Args, Parser, Subcommand};

use crate::config::DEFAULT_PROFILE_PATH;

const DEFAULT_API: &str = "http://localhost:5000";

pub fn long_version() -> String {
    format!(
        "{} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("GIT_HASH").unwrap_or("unknown"),
        option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    )
}

#[derive(Parser)]
#[command(
    name = "dumpctl",
    version,
    long_version = Box::leak(long_version().into_boxed_str()) as &'static str,
    about = "Session controller for the SQL Dumper scan service"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress scan log streaming; keep the progress bar only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit a scan and follow it to completion
    Scan(ScanArgs),
    /// List, re-open, or delete prior scan sessions
    History(HistoryArgs),
    /// Download a completed scan's CSV export
    Export(ExportArgs),
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Target URL to test
    #[arg(short, long)]
    pub url: Option<String>,

    /// Parameter to inject into
    #[arg(short, long)]
    pub param: Option<String>,

    /// HTTP method: GET or POST
    #[arg(short, long)]
    pub method: Option<String>,

    /// Proxy URL forwarded to the scan engine
    #[arg(long)]
    pub proxy: Option<String>,

    /// Cookie string the engine sends with scan requests
    #[arg(long)]
    pub cookies: Option<String>,

    /// User-Agent the engine sends with scan requests
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Custom headers as a JSON object
    #[arg(long)]
    pub headers: Option<String>,

    /// Request body for POST scans
    #[arg(long)]
    pub body: Option<String>,

    /// Tamper option, repeatable: space2comment, randomcase, between
    #[arg(long = "tamper")]
    pub tamper: Vec<String>,

    /// Scan service base URL
    #[arg(long, default_value = DEFAULT_API)]
    pub api: String,

    /// Path to the stored scan profile
    #[arg(long, default_value = DEFAULT_PROFILE_PATH)]
    pub profile: String,

    /// Print one extracted table after completion, as database.table
    #[arg(long, value_name = "DB.TABLE")]
    pub open: Option<String>,

    /// Download the CSV export to this path after completion
    #[arg(long, value_name = "FILE")]
    pub export: Option<String>,

    /// Print the raw result payload as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct HistoryArgs {
    /// Re-open a completed session's cached results
    #[arg(long, value_name = "ID")]
    pub open: Option<String>,

    /// Delete a session from the service's history
    #[arg(long, value_name = "ID")]
    pub delete: Option<String>,

    /// Scan service base URL
    #[arg(long, default_value = DEFAULT_API)]
    pub api: String,

    /// Print raw JSON instead of the formatted listing
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ExportArgs {
    /// Scan id to export
    pub scan_id: String,

    /// Output file path
    #[arg(short, long, default_value = "dump.csv")]
    pub output: String,

    /// Scan service base URL
    #[arg(long, default_value = DEFAULT_API)]
    pub api: String,
}
