//! Render a plan and write it, plus a manifest, to a sink.
//!
//! The manifest carries no timestamps or random ids: the same plan and
//! defaults always produce the same bundle, manifest included.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use ingestplan_core::config::RenderDefaults;
use ingestplan_core::plan::Plan;
use ingestplan_core::VERSION;

use crate::error::Result;
use crate::render::render_plan;
use crate::sink::BundleSink;

pub const MANIFEST_PATH: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleManifest {
    /// Version of ingestplan that rendered the bundle.
    pub generator_version: String,

    /// Stable hash of the plan the documents were rendered from.
    pub plan_hash: String,

    pub gateways: usize,
    pub pipelines: usize,
    pub tables: usize,

    /// Paths of every rendered document, in write order.
    pub documents: Vec<String>,
}

pub fn write_bundle(
    plan: &Plan,
    defaults: &RenderDefaults,
    sink: &dyn BundleSink,
) -> Result<BundleManifest> {
    let docs = render_plan(plan, defaults)?;
    let mut documents = Vec::with_capacity(docs.len());
    for doc in docs {
        sink.write(&doc.path, &doc.contents)?;
        debug!(path = %doc.path, bytes = doc.contents.len(), "wrote document");
        documents.push(doc.path);
    }

    let manifest = BundleManifest {
        generator_version: VERSION.to_string(),
        plan_hash: plan.fingerprint()?.to_hex(),
        gateways: plan.gateways.len(),
        pipelines: plan.pipeline_count(),
        tables: plan.table_count(),
        documents,
    };
    sink.write(MANIFEST_PATH, &serde_json::to_string_pretty(&manifest)?)?;

    info!(
        documents = manifest.documents.len(),
        plan_hash = %manifest.plan_hash,
        "bundle written"
    );
    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_sink::MemoryBundleSink;
    use ingestplan_core::config::AllocationConfig;
    use ingestplan_core::table::TableRecord;
    use ingestplan_planner::allocate;

    #[test]
    fn manifest_lists_every_document() {
        let cfg = AllocationConfig::with_caps(2, 4);
        let inv: Vec<TableRecord> = (0..5)
            .map(|i| TableRecord::new("s", "c", "db", "dbo", format!("t{i}")))
            .collect();
        let plan = allocate(&inv, &cfg).unwrap();
        let sink = MemoryBundleSink::new();

        let manifest = write_bundle(&plan, &cfg.defaults, &sink).unwrap();
        assert_eq!(manifest.pipelines, 3);
        assert_eq!(manifest.gateways, 2);
        assert_eq!(manifest.tables, 5);
        assert_eq!(manifest.documents.len(), 2 + 3 + 1);
        assert_eq!(sink.len(), manifest.documents.len() + 1);

        let stored: BundleManifest =
            serde_json::from_str(&sink.get(MANIFEST_PATH).unwrap()).unwrap();
        assert_eq!(stored, manifest);
        assert_eq!(stored.plan_hash, plan.fingerprint().unwrap().to_hex());
    }

    #[test]
    fn duplicate_path_writes_nothing() {
        let cfg = AllocationConfig::with_caps(1, 4);
        let inv = vec![
            TableRecord::new("a", "c", "db", "dbo", "t1"),
            TableRecord::new("b", "c", "db", "dbo", "t2"),
        ];
        let mut plan = allocate(&inv, &cfg).unwrap();
        plan.gateways[0].pipelines[1].server_slug = "a".into();
        let sink = MemoryBundleSink::new();

        let err = write_bundle(&plan, &cfg.defaults, &sink).unwrap_err();
        assert!(matches!(err, crate::Error::DuplicateDocument(_)));
        assert!(sink.is_empty());
    }
}
