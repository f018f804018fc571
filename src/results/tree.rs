use serde_json::Value;

use crate::errors::DumpctlError;
use super::types::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Database,
    Table,
}

/// Renderable summary node for one database or table. Holds counts only;
/// table contents stay in the result payload and are looked up through
/// [`table_rows`] when a table is opened.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub kind: NodeKind,
    pub label: String,
    /// Table count for a database node, row count for a table node.
    pub count: usize,
    pub children: Vec<TreeNode>,
    /// Local UI state, no backend effect.
    pub expanded: bool,
}

/// Tree built fresh from a terminal result. `Empty` is an explicit marker so
/// the presentation layer can tell "nothing extracted" apart from "still
/// loading".
#[derive(Debug, Clone, PartialEq)]
pub enum ResultTree {
    Empty,
    Databases(Vec<TreeNode>),
}

/// Build the database/table tree. Iteration follows the payload's key
/// insertion order. Malformed nesting surfaces as a render error without
/// touching the underlying session record.
pub fn build(result: &ScanResult) -> Result<ResultTree, DumpctlError> {
    let Some(data) = result.data.as_ref().filter(|data| !data.is_empty()) else {
        return Ok(ResultTree::Empty);
    };

    let mut databases = Vec::with_capacity(data.len());
    for (database, tables) in data {
        let tables = tables.as_object().ok_or_else(|| {
            DumpctlError::Render(format!(
                "Database entry '{}' is not a table mapping",
                database
            ))
        })?;

        let mut children = Vec::with_capacity(tables.len());
        for (table, rows) in tables {
            let rows = rows.as_array().ok_or_else(|| {
                DumpctlError::Render(format!(
                    "Table entry '{}.{}' is not a row list",
                    database, table
                ))
            })?;
            children.push(TreeNode {
                kind: NodeKind::Table,
                label: table.clone(),
                count: rows.len(),
                children: Vec::new(),
                expanded: false,
            });
        }

        databases.push(TreeNode {
            kind: NodeKind::Database,
            label: database.clone(),
            count: children.len(),
            children,
            expanded: false,
        });
    }

    Ok(ResultTree::Databases(databases))
}

/// Row list for one `(database, table)` pair, borrowed straight from the
/// payload so no copy is made for display.
pub fn table_rows<'a>(result: &'a ScanResult, database: &str, table: &str) -> Option<&'a [Value]> {
    result
        .data
        .as_ref()?
        .get(database)?
        .as_object()?
        .get(table)?
        .as_array()
        .map(Vec::as_slice)
}
