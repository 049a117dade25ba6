//! Eager input checks. The allocator calls both before doing any work.

use std::collections::HashMap;

use ingestplan_core::config::AllocationConfig;
use ingestplan_core::error::{Error, Result};
use ingestplan_core::table::{TableKey, TableRecord};

pub fn validate_config(cfg: &AllocationConfig) -> Result<()> {
    if cfg.pipeline_table_cap == 0 {
        return Err(Error::config("pipeline_table_cap", "must be positive"));
    }
    if cfg.gateway_table_cap == 0 {
        return Err(Error::config("gateway_table_cap", "must be positive"));
    }
    if cfg.pipeline_table_cap > cfg.gateway_table_cap {
        return Err(Error::config(
            "pipeline_table_cap",
            format!(
                "{} exceeds gateway_table_cap {}; a full pipeline could never be placed",
                cfg.pipeline_table_cap, cfg.gateway_table_cap
            ),
        ));
    }
    Ok(())
}

/// Rows are checked in input order. For each row: identifying fields,
/// then identity uniqueness.
pub fn validate_inventory(inventory: &[TableRecord]) -> Result<()> {
    let mut seen: HashMap<TableKey, usize> = HashMap::with_capacity(inventory.len());

    for (idx, rec) in inventory.iter().enumerate() {
        let row = idx + 1;

        for (field, value) in rec.identifying_fields() {
            if value.trim().is_empty() {
                return Err(Error::inventory(row, format!("{field} is empty")));
            }
        }

        if let Some(first_row) = seen.insert(rec.key(), row) {
            return Err(Error::DuplicateTable {
                key: rec.key(),
                first_row,
                second_row: row,
            });
        }
    }
    Ok(())
}
