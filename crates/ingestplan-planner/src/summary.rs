//! Plan summary for reports and logs.

use std::collections::BTreeSet;

use ingestplan_core::plan::{PipelineKind, Plan};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub gateways: usize,
    pub pipelines: usize,
    pub tables: usize,
    pub priority_pipelines: usize,
    pub large_pipelines: usize,
    pub normal_pipelines: usize,
    /// Distinct servers with at least one pipeline.
    pub servers: usize,
    /// Sum of known row counts (unknown counts contribute 0).
    pub total_rows: u64,
    /// Table count of the most loaded gateway.
    pub max_gateway_tables: usize,
}

pub fn summarize(plan: &Plan) -> PlanSummary {
    let mut s = PlanSummary {
        gateways: plan.gateways.len(),
        ..Default::default()
    };
    let mut servers = BTreeSet::new();

    for g in &plan.gateways {
        s.max_gateway_tables = s.max_gateway_tables.max(g.table_count());
        for p in &g.pipelines {
            s.pipelines += 1;
            s.tables += p.table_count();
            s.total_rows += p.total_rows();
            servers.insert(p.server_name.as_str());
            match p.kind {
                PipelineKind::Priority => s.priority_pipelines += 1,
                PipelineKind::Large => s.large_pipelines += 1,
                PipelineKind::Normal => s.normal_pipelines += 1,
            }
        }
    }
    s.servers = servers.len();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocate;
    use ingestplan_core::config::AllocationConfig;
    use ingestplan_core::table::TableRecord;

    #[test]
    fn summary_counts_by_kind() {
        let inv = vec![
            TableRecord::new("a", "ca", "db", "dbo", "p").with_priority(true).with_rows(7),
            TableRecord::new("a", "ca", "db", "dbo", "big").with_rows(100),
            TableRecord::new("b", "cb", "db", "dbo", "x").with_rows(3),
            TableRecord::new("b", "cb", "db", "dbo", "y"),
        ];
        let cfg = AllocationConfig::with_caps(1, 2).with_large_threshold(100);
        let s = summarize(&allocate(&inv, &cfg).unwrap());
        assert_eq!(
            s,
            PlanSummary {
                gateways: 2,
                pipelines: 4,
                tables: 4,
                priority_pipelines: 1,
                large_pipelines: 1,
                normal_pipelines: 2,
                servers: 2,
                total_rows: 110,
                max_gateway_tables: 2,
            }
        );
    }

    #[test]
    fn empty_plan_summary_is_zero() {
        assert_eq!(summarize(&Plan::default()), PlanSummary::default());
    }
}
