//! Allocation configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationConfig {
    /// Max tables per non-priority pipeline.
    pub pipeline_table_cap: usize,

    /// Max tables per gateway, summed across its pipelines.
    pub gateway_table_cap: usize,

    /// Tables with `row_count >= large_table_threshold` are spread across large pipelines.
    pub large_table_threshold: u64,

    /// Copied onto every pipeline for the renderer. The allocator never reads these.
    #[serde(default)]
    pub defaults: RenderDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDefaults {
    pub destination_catalog_default: String,

    /// When unset, each table lands in a schema named after its source schema.
    pub destination_schema_default: Option<String>,

    pub source_type_default: String,

    pub gateway_node_type: Option<String>,
    pub gateway_driver_node_type: Option<String>,

    /// Staging location for gateways; falls back to the destination catalog/schema.
    pub gateway_storage_catalog: Option<String>,
    pub gateway_storage_schema: Option<String>,

    pub pipeline_timeout_minutes: Option<u32>,
}

impl Default for RenderDefaults {
    fn default() -> Self {
        Self {
            destination_catalog_default: "main".to_string(),
            destination_schema_default: None,
            source_type_default: "SQLSERVER".to_string(),
            gateway_node_type: None,
            gateway_driver_node_type: None,
            gateway_storage_catalog: None,
            gateway_storage_schema: None,
            pipeline_timeout_minutes: None,
        }
    }
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            pipeline_table_cap: 150,
            gateway_table_cap: 1000,
            large_table_threshold: 50_000_000,
            defaults: RenderDefaults::default(),
        }
    }
}

impl AllocationConfig {
    pub fn with_caps(pipeline_table_cap: usize, gateway_table_cap: usize) -> Self {
        Self {
            pipeline_table_cap,
            gateway_table_cap,
            ..Self::default()
        }
    }

    pub fn with_large_threshold(mut self, threshold: u64) -> Self {
        self.large_table_threshold = threshold;
        self
    }

    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `INGESTPLAN_PIPELINE_TABLE_CAP`: max tables per pipeline
    /// - `INGESTPLAN_GATEWAY_TABLE_CAP`: max tables per gateway
    /// - `INGESTPLAN_LARGE_TABLE_THRESHOLD`: row count at which a table is large
    /// - `INGESTPLAN_DESTINATION_CATALOG`: destination catalog
    /// - `INGESTPLAN_DESTINATION_SCHEMA`: destination schema
    /// - `INGESTPLAN_SOURCE_TYPE`: source type written into pipeline definitions
    ///
    /// Values that fail to parse, negative numbers included, are ignored and
    /// the default is kept.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AllocationConfig::from_env`] but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(s) = lookup("INGESTPLAN_PIPELINE_TABLE_CAP") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.pipeline_table_cap = v;
            }
        }

        if let Some(s) = lookup("INGESTPLAN_GATEWAY_TABLE_CAP") {
            if let Ok(v) = s.trim().parse::<usize>() {
                cfg.gateway_table_cap = v;
            }
        }

        if let Some(s) = lookup("INGESTPLAN_LARGE_TABLE_THRESHOLD") {
            if let Ok(v) = s.trim().parse::<u64>() {
                cfg.large_table_threshold = v;
            }
        }

        if let Some(s) = lookup("INGESTPLAN_DESTINATION_CATALOG") {
            cfg.defaults.destination_catalog_default = s;
        }

        if let Some(s) = lookup("INGESTPLAN_DESTINATION_SCHEMA") {
            cfg.defaults.destination_schema_default = Some(s);
        }

        if let Some(s) = lookup("INGESTPLAN_SOURCE_TYPE") {
            cfg.defaults.source_type_default = s;
        }

        cfg
    }
}
