pub mod progress;

use console::style;

use crate::client::{ScanStatus, SessionSummary};
use crate::results::{ResultTree, ScanResult, TableView};
use crate::session::{LogEntry, LogLevel};

pub use progress::ScanProgress;

/// Style one engine log line by its level.
pub fn render_log_entry(entry: &LogEntry) -> String {
    match entry.level {
        LogLevel::Info => format!("  {}", style(&entry.message).dim()),
        LogLevel::Warning => format!("  {}", style(&entry.message).yellow()),
        LogLevel::Error => format!("  {}", style(&entry.message).red()),
        LogLevel::Success => format!("  {}", style(&entry.message).green()),
    }
}

/// Header block above the tree: vulnerability verdict, engine fingerprints,
/// WAF warning, and extraction errors.
pub fn render_summary_header(result: &ScanResult) -> String {
    let mut out = String::new();

    if result.vulnerable {
        out.push_str(&format!("{} Vulnerable\n", style("✓").green().bold()));
    } else {
        out.push_str(&format!("{} Not vulnerable\n", style("✗").red().bold()));
    }

    let mut info = Vec::new();
    if let Some(dbms) = &result.dbms {
        info.push(format!("DBMS: {}", dbms));
    }
    if let Some(current_db) = &result.current_db {
        info.push(format!("Database: {}", current_db));
    }
    if !info.is_empty() {
        out.push_str(&format!("{}\n", style(info.join(" | ")).dim()));
    }

    if let Some(waf) = &result.waf_detected {
        out.push_str(&format!(
            "{} WAF detected: {}\n",
            style("⚠").yellow().bold(),
            style(waf).yellow()
        ));
    }

    if let Some(errors) = result.errors.as_ref().filter(|e| !e.is_empty()) {
        out.push_str(&format!("{}\n", style("Errors:").red().bold()));
        for error in errors {
            out.push_str(&format!("  {} {}\n", style("-").red(), error));
        }
    }

    out
}

/// Database/table tree, or the explicit no-data line for an empty result.
pub fn render_tree(tree: &ResultTree) -> String {
    let ResultTree::Databases(nodes) = tree else {
        return format!("{}\n", style("No data extracted").dim());
    };

    let mut out = String::new();
    for node in nodes {
        out.push_str(&format!(
            "{} {} ({})\n",
            style("▸").cyan(),
            style(&node.label).cyan().bold(),
            pluralize(node.count, "table")
        ));
        for child in &node.children {
            out.push_str(&format!(
                "    {} ({})\n",
                &child.label,
                pluralize(child.count, "row")
            ));
        }
    }
    out
}

/// One materialized table, column-aligned, sensitive headers flagged.
pub fn render_table(view: &TableView<'_>) -> String {
    if view.rows.is_empty() {
        return format!("{}\n", style("No rows to display").dim());
    }

    let cells: Vec<Vec<String>> = view
        .rows
        .iter()
        .map(|row| {
            view.columns
                .iter()
                .map(|column| view.cell(row, &column.name))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = view
        .columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let header = header_text(&column.name, column.sensitive);
            cells
                .iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "{}.{}\n",
        style(&view.database).cyan(),
        style(&view.table).cyan().bold()
    ));

    let header_line: Vec<String> = view
        .columns
        .iter()
        .zip(&widths)
        .map(|(column, width)| {
            let width = *width;
            let padded = format!("{:<width$}", header_text(&column.name, column.sensitive));
            if column.sensitive {
                style(padded).yellow().bold().to_string()
            } else {
                style(padded).bold().to_string()
            }
        })
        .collect();
    out.push_str(&format!("  {}\n", header_line.join("  ")));

    for row in &cells {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .zip(&view.columns)
            .map(|((cell, width), column)| {
                let width = *width;
                let padded = format!("{:<width$}", cell);
                if column.sensitive {
                    style(padded).yellow().to_string()
                } else {
                    padded
                }
            })
            .collect();
        out.push_str(&format!("  {}\n", line.join("  ")));
    }

    out
}

/// Session history listing, newest first, or the explicit empty-state line.
pub fn render_history(sessions: &[SessionSummary]) -> String {
    if sessions.is_empty() {
        return format!("{}\n", style("No sessions yet").dim());
    }

    let mut out = String::new();
    for session in sessions {
        let badge = match session.status {
            ScanStatus::Completed => style("✓").green(),
            ScanStatus::Failed => style("✗").red(),
            _ => style("⟳").cyan(),
        };
        let timestamp = session.timestamp.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "{} {}  {}  {}  {}\n",
            badge,
            style(&session.id).cyan(),
            style(timestamp).dim(),
            session.url,
            style(session.status.as_str()).dim()
        ));
    }
    out
}

fn header_text(name: &str, sensitive: bool) -> String {
    if sensitive {
        format!("⚠ {}", name)
    } else {
        name.to_string()
    }
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::tree;

    fn completed_result() -> ScanResult {
        serde_json::from_str(
            r#"{
                "vulnerable": true,
                "dbms": "MySQL",
                "data": {"db1": {"users": [{"id": 1, "password": "x"}]}}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_tree_rendering_counts() {
        console::set_colors_enabled(false);
        let result = completed_result();
        let rendered = render_tree(&tree::build(&result).unwrap());
        assert!(rendered.contains("db1 (1 table)"));
        assert!(rendered.contains("users (1 row)"));
    }

    #[test]
    fn test_empty_tree_renders_marker() {
        console::set_colors_enabled(false);
        let rendered = render_tree(&ResultTree::Empty);
        assert!(rendered.contains("No data extracted"));
    }

    #[test]
    fn test_table_rendering_flags_sensitive_header() {
        console::set_colors_enabled(false);
        let result = completed_result();
        let view = crate::results::table::materialize(&result, "db1", "users").unwrap();
        let rendered = render_table(&view);
        assert!(rendered.contains("⚠ password"));
        assert!(!rendered.contains("⚠ id"));
    }

    #[test]
    fn test_history_empty_state() {
        console::set_colors_enabled(false);
        let rendered = render_history(&[]);
        assert!(rendered.contains("No sessions yet"));
    }

    #[test]
    fn test_summary_header_verdict() {
        console::set_colors_enabled(false);
        let rendered = render_summary_header(&completed_result());
        assert!(rendered.contains("Vulnerable"));
        assert!(rendered.contains("DBMS: MySQL"));
    }
}
