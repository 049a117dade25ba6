//! Allocation output: gateways owning pipelines owning tables.
//!
//! Everything here is built in one allocation pass and treated as immutable
//! afterwards. Renderers read it; nothing writes back.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::RenderDefaults;
use crate::error::Result;
use crate::hash::{hash_serde, Hash256};
use crate::id::{GatewayId, PipelineId};
use crate::table::TableRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// Exactly one table flagged as priority.
    Priority,
    /// Tables at or above the large-table threshold, balanced per server.
    Large,
    /// Everything else, filled in input order.
    Normal,
}

impl PipelineKind {
    pub const ALL: [PipelineKind; 3] = [Self::Priority, Self::Large, Self::Normal];

    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::Priority => "priority",
            PipelineKind::Large => "large",
            PipelineKind::Normal => "normal",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Destination settings carried on each pipeline for the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTarget {
    pub destination_catalog: String,
    pub destination_schema: Option<String>,
    pub source_type: String,
}

impl From<&RenderDefaults> for PipelineTarget {
    fn from(d: &RenderDefaults) -> Self {
        Self {
            destination_catalog: d.destination_catalog_default.clone(),
            destination_schema: d.destination_schema_default.clone(),
            source_type: d.source_type_default.clone(),
        }
    }
}

impl PipelineTarget {
    /// Destination schema for `table`: the configured default, else its source schema.
    pub fn schema_for<'a>(&'a self, table: &'a TableRecord) -> &'a str {
        self.destination_schema
            .as_deref()
            .unwrap_or(&table.schema_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: PipelineId,
    pub kind: PipelineKind,
    pub server_name: String,
    /// File-name stem for `server_name`. Distinct servers get distinct slugs.
    pub server_slug: String,
    /// 1-based position among pipelines sharing `(server_name, kind)`.
    pub ordinal: u32,
    pub tables: Vec<TableRecord>,
    pub target: PipelineTarget,
}

impl Pipeline {
    /// Stable name, e.g. `sql01_normal_002`. Used for rendered file names.
    pub fn name(&self) -> String {
        format!("{}_{}_{:03}", self.server_slug, self.kind, self.ordinal)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Distinct connection names of the tables, in first-seen order.
    pub fn connection_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for t in &self.tables {
            if !out.contains(&t.connection_name.as_str()) {
                out.push(&t.connection_name);
            }
        }
        out
    }

    /// Sum of known row counts.
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.row_count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gateway {
    pub id: GatewayId,
    pub pipelines: Vec<Pipeline>,
}

impl Gateway {
    /// Stable name, e.g. `gateway_001`.
    pub fn name(&self) -> String {
        format!("gateway_{:03}", self.id.get() + 1)
    }

    pub fn table_count(&self) -> usize {
        self.pipelines.iter().map(Pipeline::table_count).sum()
    }

    /// Distinct connection names in first-seen order.
    pub fn connection_names(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for name in self.pipelines.iter().flat_map(Pipeline::connection_names) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
        out
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub gateways: Vec<Gateway>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    /// Pipelines in plan order (gateway by gateway).
    pub fn pipelines(&self) -> impl Iterator<Item = &Pipeline> + '_ {
        self.gateways.iter().flat_map(|g| g.pipelines.iter())
    }

    /// Tables in plan order.
    pub fn tables(&self) -> impl Iterator<Item = &TableRecord> + '_ {
        self.pipelines().flat_map(|p| p.tables.iter())
    }

    pub fn pipeline_count(&self) -> usize {
        self.gateways.iter().map(|g| g.pipelines.len()).sum()
    }

    pub fn table_count(&self) -> usize {
        self.gateways.iter().map(Gateway::table_count).sum()
    }

    /// Gateway that owns `pipeline`, if it belongs to this plan.
    pub fn gateway_of(&self, pipeline: PipelineId) -> Option<&Gateway> {
        self.gateways
            .iter()
            .find(|g| g.pipelines.iter().any(|p| p.id == pipeline))
    }

    /// Stable content hash; equal plans always hash equal.
    pub fn fingerprint(&self) -> Result<Hash256> {
        hash_serde(self)
    }
}

/// Lowercase, and replace anything outside `[a-z0-9_]` with `_`.
pub fn sanitize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
