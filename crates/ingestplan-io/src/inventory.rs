//! CSV inventory reader.
//!
//! Expected header (order does not matter, extra columns are ignored):
//! `server_name, connection_name, database_name, schema_name, table_name,
//! row_count, priority_flag`. The last two are optional; missing or empty
//! values mean "unknown size" and "not priority".
//!
//! Only per-cell parsing happens here. Blank identifying fields, duplicates and
//! cap checks are left to `ingestplan_planner::validate`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use ingestplan_core::error::Error as CoreError;
use ingestplan_core::table::TableRecord;

use crate::error::Result;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "server_name",
    "connection_name",
    "database_name",
    "schema_name",
    "table_name",
];

#[derive(Debug, Deserialize)]
struct RawRow {
    server_name: Option<String>,
    connection_name: Option<String>,
    database_name: Option<String>,
    schema_name: Option<String>,
    table_name: Option<String>,
    #[serde(default)]
    row_count: Option<String>,
    #[serde(default)]
    priority_flag: Option<String>,
}

pub fn read_inventory_path(path: impl AsRef<Path>) -> Result<Vec<TableRecord>> {
    let f = File::open(path.as_ref())?;
    let tables = read_inventory(f)?;
    debug!(path = %path.as_ref().display(), tables = tables.len(), "read inventory");
    Ok(tables)
}

/// Read an inventory CSV. Row numbers in errors are 1-based data rows; row 0 is the header.
pub fn read_inventory<R: Read>(reader: R) -> Result<Vec<TableRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(CoreError::inventory(0, format!("missing column {col}")).into());
        }
    }

    let mut out = Vec::new();
    for (idx, rec) in rdr.deserialize::<RawRow>().enumerate() {
        let row = idx + 1;
        let raw = rec?;
        out.push(TableRecord {
            server_name: raw.server_name.unwrap_or_default(),
            connection_name: raw.connection_name.unwrap_or_default(),
            database_name: raw.database_name.unwrap_or_default(),
            schema_name: raw.schema_name.unwrap_or_default(),
            table_name: raw.table_name.unwrap_or_default(),
            row_count: parse_row_count(raw.row_count.as_deref().unwrap_or(""))
                .map_err(|reason| CoreError::inventory(row, reason))?,
            priority_flag: parse_flag(raw.priority_flag.as_deref().unwrap_or(""))
                .map_err(|reason| CoreError::inventory(row, reason))?,
        });
    }
    Ok(out)
}

/// Empty means unknown (0). Accepts integers and integral floats (`1200.0`),
/// which is what spreadsheet and dataframe exports tend to produce.
pub fn parse_row_count(raw: &str) -> std::result::Result<u64, String> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(0);
    }
    if let Ok(v) = s.parse::<i64>() {
        return u64::try_from(v).map_err(|_| format!("row_count {v} is negative"));
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v >= 0.0 && v <= u64::MAX as f64 => {
            Ok(v as u64)
        }
        Ok(v) if v < 0.0 => Err(format!("row_count {s} is negative")),
        _ => Err(format!("row_count {s:?} is not a non-negative integer")),
    }
}

pub fn parse_flag(raw: &str) -> std::result::Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "" | "0" | "false" | "no" | "n" => Ok(false),
        other => Err(format!("priority_flag {other:?} is not 1/0")),
    }
}
