//! CSV export of JSON rows.
//!
//! Each row is flattened to dotted keys (`address.road`, `location.lat`);
//! the header is the union of keys in first-seen order, and a row missing a
//! column gets an empty cell.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use strikemap_core::PendingStrike;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write CSV to {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to serialize row for export: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// An ordered list of `(column, cell)` pairs.
pub(crate) type FlatRow = Vec<(String, String)>;

/// Flattens a JSON value into dotted-key cells.
///
/// Nested objects recurse, arrays are kept as compact JSON, null becomes an
/// empty cell. A non-object top-level value yields a single `value` column.
pub(crate) fn flatten(value: &Value) -> FlatRow {
    let mut row = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                flatten_into(key, child, &mut row);
            }
        }
        other => row.push(("value".to_string(), cell(other))),
    }
    row
}

fn flatten_into(key: &str, value: &Value, row: &mut FlatRow) {
    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                flatten_into(&format!("{key}.{child_key}"), child, row);
            }
        }
        other => row.push((key.to_string(), cell(other))),
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Writes `rows` to `path` as CSV with a header row, creating parent
/// directories as needed.
///
/// The header is the union of the rows' flattened keys, so no rows means an
/// empty file. Use [`export_serialized`] when the columns are fixed.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the parent directory cannot be created and
/// [`ExportError::Csv`] if the file cannot be opened or written.
pub(crate) fn export_csv(path: &Path, rows: &[Value]) -> Result<(), ExportError> {
    write_csv(path, &[], rows)
}

/// Serializes `items` to JSON and writes them with `columns` as the leading
/// header, so the header is present even when `items` is empty. Keys outside
/// `columns` are appended after them.
///
/// # Errors
///
/// Returns [`ExportError::Serialize`] if an item cannot be converted, or any
/// error from [`export_csv`].
pub(crate) fn export_serialized<T: Serialize>(
    path: &Path,
    columns: &[&str],
    items: &[T],
) -> Result<(), ExportError> {
    let rows = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    write_csv(path, columns, &rows)
}

fn write_csv(path: &Path, columns: &[&str], rows: &[Value]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ExportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let flat: Vec<FlatRow> = rows.iter().map(flatten).collect();
    let header = union_columns(columns, &flat);
    let csv_err = |source: csv::Error| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if !header.is_empty() {
        writer.write_record(&header).map_err(csv_err)?;
    }
    for row in &flat {
        let record = header.iter().map(|column| {
            row.iter()
                .find(|(key, _)| key == column)
                .map_or("", |(_, value)| value.as_str())
        });
        writer.write_record(record).map_err(csv_err)?;
    }
    writer
        .flush()
        .map_err(|e| csv_err(csv::Error::from(e)))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "wrote CSV");
    Ok(())
}

/// Writes the `{id, geom}` pairs of strikes awaiting address lookup.
///
/// # Errors
///
/// See [`export_csv`].
pub(crate) fn write_geocode_dump(path: &Path, pending: &[PendingStrike]) -> Result<(), ExportError> {
    let rows: Vec<Value> = pending
        .iter()
        .map(|p| serde_json::json!({"id": p.id(), "geom": p.geom()}))
        .collect();
    export_csv(path, &rows)
}

fn union_columns(columns: &[&str], rows: &[FlatRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut header = Vec::new();
    let keys = columns
        .iter()
        .copied()
        .chain(rows.iter().flatten().map(|(key, _)| key.as_str()));
    for key in keys {
        if seen.insert(key) {
            header.push(key.to_string());
        }
    }
    header
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
