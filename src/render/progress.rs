use indicatif::{ProgressBar, ProgressStyle};

use crate::session::LogEntry;
use super::render_log_entry;

/// Progress bar plus streaming log output while a scan is polled.
///
/// Each snapshot carries the full log list; the bar position is set
/// absolutely and only not-yet-printed lines are emitted above the bar, so
/// re-applying a snapshot draws nothing new.
pub struct ScanProgress {
    bar: ProgressBar,
    printed_logs: usize,
    quiet: bool,
}

impl ScanProgress {
    pub fn new(quiet: bool) -> Self {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/dark_gray} {pos:>3}% | {msg}")
                .unwrap()
                .progress_chars("█▓░"),
        );
        bar.set_message("Waiting for scan status...");

        Self {
            bar,
            printed_logs: 0,
            quiet,
        }
    }

    pub fn apply(&mut self, progress: u8, logs: &[LogEntry]) {
        if !self.quiet && logs.len() > self.printed_logs {
            for entry in &logs[self.printed_logs..] {
                self.bar.println(render_log_entry(entry));
            }
            self.printed_logs = logs.len();
        }
        self.bar.set_position(u64::from(progress));
        self.bar.set_message(format!("{} log lines", logs.len()));
    }

    pub fn note_transient(&self, error: &str) {
        if !self.quiet {
            self.bar
                .println(format!("  {}", console::style(error).red().dim()));
        }
    }

    pub fn finish(&self, message: &str) {
        self.bar.set_position(100);
        self.bar.finish_with_message(message.to_string());
    }
}
