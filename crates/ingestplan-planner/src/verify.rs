//! Invariant checks for allocated plans.
//!
//! Intended for tests and debug tooling. They panic with a description of the
//! first violation and should stay cheap.

use std::collections::{BTreeMap, HashMap};

use ingestplan_core::config::AllocationConfig;
use ingestplan_core::plan::{PipelineKind, Plan};
use ingestplan_core::table::{TableKey, TableRecord};

/// Every inventory table appears in exactly one pipeline, and nothing else does.
pub fn assert_complete(plan: &Plan, inventory: &[TableRecord]) {
    let mut remaining: HashMap<TableKey, usize> = HashMap::new();
    for t in inventory {
        *remaining.entry(t.key()).or_default() += 1;
    }
    for t in plan.tables() {
        let key = t.key();
        match remaining.get_mut(&key) {
            Some(n) if *n > 0 => *n -= 1,
            _ => panic!("table {key} is duplicated or not in the inventory"),
        }
    }
    if let Some((key, _)) = remaining.iter().find(|(_, n)| **n > 0) {
        panic!("table {key} was dropped from the plan");
    }
}

/// Priority tables sit alone in `priority` pipelines, and only they do.
pub fn assert_priority_isolated(plan: &Plan) {
    for p in plan.pipelines() {
        let flagged = p.tables.iter().filter(|t| t.priority_flag).count();
        if flagged > 0 || p.kind == PipelineKind::Priority {
            assert!(
                p.kind == PipelineKind::Priority && p.tables.len() == 1 && flagged == 1,
                "pipeline {} ({}) mixes priority isolation: {} tables, {} flagged",
                p.id,
                p.kind,
                p.tables.len(),
                flagged
            );
        }
    }
}

/// Pipeline and gateway caps hold, pipelines are non-empty and single-server.
pub fn assert_caps_respected(plan: &Plan, cfg: &AllocationConfig) {
    for g in &plan.gateways {
        assert!(!g.pipelines.is_empty(), "gateway {} is empty", g.id);
        assert!(
            g.table_count() <= cfg.gateway_table_cap,
            "gateway {} holds {} tables > {}",
            g.id,
            g.table_count(),
            cfg.gateway_table_cap
        );
        for p in &g.pipelines {
            assert!(!p.tables.is_empty(), "pipeline {} is empty", p.id);
            assert!(
                p.tables.len() <= cfg.pipeline_table_cap,
                "pipeline {} holds {} tables > {}",
                p.id,
                p.tables.len(),
                cfg.pipeline_table_cap
            );
            assert!(
                p.tables.iter().all(|t| t.server_name == p.server_name),
                "pipeline {} spans servers",
                p.id
            );
        }
    }
}

/// Per server, large pipelines number `ceil(L / cap)` and differ in size by at most one.
pub fn assert_large_balanced(plan: &Plan, cfg: &AllocationConfig) {
    let mut per_server: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for p in plan.pipelines().filter(|p| p.kind == PipelineKind::Large) {
        per_server
            .entry(p.server_name.as_str())
            .or_default()
            .push(p.tables.len());
    }
    for (server, sizes) in per_server {
        let total: usize = sizes.iter().sum();
        let expected = total.div_ceil(cfg.pipeline_table_cap);
        assert_eq!(
            sizes.len(),
            expected,
            "server {server}: {} large pipelines for {total} tables, expected {expected}",
            sizes.len()
        );
        let (min, max) = (
            sizes.iter().copied().min().unwrap_or(0),
            sizes.iter().copied().max().unwrap_or(0),
        );
        assert!(
            max - min <= 1,
            "server {server}: large pipeline sizes {sizes:?} are unbalanced"
        );
    }
}
