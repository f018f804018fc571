use serde_json::Value;

use crate::errors::DumpctlError;
use super::classifier::is_sensitive;
use super::tree::table_rows;
use super::types::ScanResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub sensitive: bool,
}

/// One table's rows materialized for display. The first row's keys define
/// the column set; later rows are rendered against it. Classification marks
/// rendering metadata only, leaving the underlying data untouched.
#[derive(Debug)]
pub struct TableView<'a> {
    pub database: String,
    pub table: String,
    pub columns: Vec<Column>,
    pub rows: &'a [Value],
}

pub fn materialize<'a>(
    result: &'a ScanResult,
    database: &str,
    table: &str,
) -> Result<TableView<'a>, DumpctlError> {
    let rows = table_rows(result, database, table).ok_or_else(|| {
        DumpctlError::Render(format!("No extracted data for {}.{}", database, table))
    })?;

    let columns = match rows.first().and_then(Value::as_object) {
        Some(first) => first
            .keys()
            .map(|name| Column {
                name: name.clone(),
                sensitive: is_sensitive(name),
            })
            .collect(),
        None => Vec::new(),
    };

    Ok(TableView {
        database: database.to_string(),
        table: table.to_string(),
        columns,
        rows,
    })
}

impl TableView<'_> {
    /// Cell text for a row/column pair. Missing columns and nulls render
    /// empty; non-string scalars render via their JSON form.
    pub fn cell(&self, row: &Value, column: &str) -> String {
        match row.get(column) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
