//! YAML config overrides.
//!
//! Example:
//! ```yaml
//! pipeline_table_cap: 150
//! gateway_table_cap: 1000
//! large_table_threshold: 50000000
//! destination_catalog: bronze
//! destination_schema: sqlserver_raw
//! gateway_node_type: r5.xlarge
//! ```
//!
//! Every key is optional; present keys override the environment/defaults layer.

use serde::{Deserialize, Serialize};

use ingestplan_core::config::AllocationConfig;
use ingestplan_core::error::Error as CoreError;

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigDoc {
    // Signed so that negative values surface as config errors rather than YAML type errors.
    pub pipeline_table_cap: Option<i64>,
    pub gateway_table_cap: Option<i64>,
    pub large_table_threshold: Option<i64>,

    pub destination_catalog: Option<String>,
    pub destination_schema: Option<String>,
    pub source_type: Option<String>,
    pub gateway_node_type: Option<String>,
    pub gateway_driver_node_type: Option<String>,
    pub gateway_storage_catalog: Option<String>,
    pub gateway_storage_schema: Option<String>,
    pub pipeline_timeout_minutes: Option<u32>,
}

pub fn parse_config_yaml(yaml_src: &str) -> Result<ConfigDoc> {
    // An empty file is a valid document with no overrides.
    if yaml_src.trim().is_empty() {
        return Ok(ConfigDoc::default());
    }
    Ok(serde_yaml::from_str(yaml_src)?)
}

impl ConfigDoc {
    /// Apply present keys onto `cfg`. Zero caps are left for
    /// `ingestplan_planner::validate_config` to reject; negative values fail here.
    pub fn apply(&self, cfg: &mut AllocationConfig) -> Result<()> {
        if let Some(v) = self.pipeline_table_cap {
            cfg.pipeline_table_cap = non_negative("pipeline_table_cap", v)? as usize;
        }
        if let Some(v) = self.gateway_table_cap {
            cfg.gateway_table_cap = non_negative("gateway_table_cap", v)? as usize;
        }
        if let Some(v) = self.large_table_threshold {
            cfg.large_table_threshold = non_negative("large_table_threshold", v)?;
        }

        let d = &mut cfg.defaults;
        if let Some(v) = &self.destination_catalog {
            d.destination_catalog_default = v.clone();
        }
        if let Some(v) = &self.destination_schema {
            d.destination_schema_default = Some(v.clone());
        }
        if let Some(v) = &self.source_type {
            d.source_type_default = v.clone();
        }
        if let Some(v) = &self.gateway_node_type {
            d.gateway_node_type = Some(v.clone());
        }
        if let Some(v) = &self.gateway_driver_node_type {
            d.gateway_driver_node_type = Some(v.clone());
        }
        if let Some(v) = &self.gateway_storage_catalog {
            d.gateway_storage_catalog = Some(v.clone());
        }
        if let Some(v) = &self.gateway_storage_schema {
            d.gateway_storage_schema = Some(v.clone());
        }
        if let Some(v) = self.pipeline_timeout_minutes {
            d.pipeline_timeout_minutes = Some(v);
        }
        Ok(())
    }
}

fn non_negative(parameter: &'static str, v: i64) -> Result<u64> {
    u64::try_from(v)
        .map_err(|_| CoreError::config(parameter, format!("{v} is negative")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn parses_and_applies_overrides() {
        let doc = parse_config_yaml(
            r#"
pipeline_table_cap: 50
large_table_threshold: 0
destination_catalog: bronze
gateway_node_type: r5.xlarge
"#,
        )
        .unwrap();

        let mut cfg = AllocationConfig::default();
        doc.apply(&mut cfg).unwrap();
        assert_eq!(cfg.pipeline_table_cap, 50);
        assert_eq!(cfg.gateway_table_cap, 1000);
        assert_eq!(cfg.large_table_threshold, 0);
        assert_eq!(cfg.defaults.destination_catalog_default, "bronze");
        assert_eq!(cfg.defaults.gateway_node_type.as_deref(), Some("r5.xlarge"));
    }

    #[test]
    fn negative_threshold_is_invalid_config() {
        let doc = parse_config_yaml("large_table_threshold: -1").unwrap();
        let err = doc.apply(&mut AllocationConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Core(CoreError::InvalidConfig {
                parameter: "large_table_threshold",
                ..
            })
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse_config_yaml("pipeline_cap: 3").is_err());
    }

    #[test]
    fn empty_document_has_no_overrides() {
        assert_eq!(parse_config_yaml("  \n").unwrap(), ConfigDoc::default());
    }
}
