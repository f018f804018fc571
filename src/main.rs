use clap::Parser;
use tracing_subscriber::EnvFilter;

use dumpctl::cli::{self, Commands};
use dumpctl::errors::DumpctlError;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    let result = match cli.command {
        Commands::Scan(args) => cli::scan::handle_scan(args, cli.quiet).await,
        Commands::History(args) => cli::history::handle_history(args).await,
        Commands::Export(args) => cli::export::handle_export(args).await,
    };

    match result {
        Ok(()) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            let exit_code = match &e {
                DumpctlError::Validation(_) | DumpctlError::Config(_) => 2,
                DumpctlError::Submission(_) => 3,
                DumpctlError::Network(_) => 4,
                _ => 1,
            };
            std::process::exit(exit_code);
        }
    }
}
