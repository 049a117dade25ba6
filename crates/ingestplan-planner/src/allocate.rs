//! The allocator: validated inventory → pipelines → gateways.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use ingestplan_core::config::AllocationConfig;
use ingestplan_core::error::Result;
use ingestplan_core::id::PipelineId;
use ingestplan_core::plan::{sanitize, Pipeline, PipelineKind, PipelineTarget, Plan};
use ingestplan_core::table::TableRecord;

use crate::gateway::pack_gateways;
use crate::validate::{validate_config, validate_inventory};

/// Non-priority tables of one server, split by the large-table threshold.
struct ServerBucket<'a> {
    server: &'a str,
    slug: String,
    large: Vec<&'a TableRecord>,
    small: Vec<&'a TableRecord>,
}

/// A pipeline before ids are assigned.
struct Draft<'a> {
    kind: PipelineKind,
    bucket: usize,
    ordinal: u32,
    tables: Vec<&'a TableRecord>,
}

/// Allocate `inventory` into a [`Plan`].
///
/// Fails without returning a partial plan if the config or inventory is invalid.
/// Identical input (including row order) always produces an identical plan.
pub fn allocate(inventory: &[TableRecord], cfg: &AllocationConfig) -> Result<Plan> {
    validate_config(cfg)?;
    validate_inventory(inventory)?;

    if inventory.is_empty() {
        debug!("empty inventory; nothing to allocate");
        return Ok(Plan::default());
    }

    let cap = cfg.pipeline_table_cap;
    let (priority, buckets) = partition(inventory, cfg.large_table_threshold);

    let mut drafts: Vec<Draft<'_>> = Vec::new();

    // Phase 1: one dedicated pipeline per priority table.
    let mut priority_ordinals: HashMap<usize, u32> = HashMap::new();
    for &(bucket, t) in &priority {
        let ordinal = priority_ordinals.entry(bucket).or_insert(0);
        *ordinal += 1;
        drafts.push(Draft {
            kind: PipelineKind::Priority,
            bucket,
            ordinal: *ordinal,
            tables: vec![t],
        });
    }
    debug!(pipelines = priority.len(), "isolated priority tables");

    // Phase 2: large tables, round-robin per server.
    let before = drafts.len();
    for (bucket, b) in buckets.iter().enumerate() {
        for (i, group) in spread_evenly(&b.large, cap).into_iter().enumerate() {
            drafts.push(Draft {
                kind: PipelineKind::Large,
                bucket,
                ordinal: i as u32 + 1,
                tables: group,
            });
        }
    }
    debug!(pipelines = drafts.len() - before, "distributed large tables");

    // Phase 3: the rest, filled in input order per server.
    let before = drafts.len();
    for (bucket, b) in buckets.iter().enumerate() {
        for (i, chunk) in b.small.chunks(cap).enumerate() {
            drafts.push(Draft {
                kind: PipelineKind::Normal,
                bucket,
                ordinal: i as u32 + 1,
                tables: chunk.to_vec(),
            });
        }
    }
    debug!(pipelines = drafts.len() - before, "filled normal pipelines");

    // Phase 4: number in concatenation order, then pack.
    let target = PipelineTarget::from(&cfg.defaults);
    let pipelines: Vec<Pipeline> = drafts
        .into_iter()
        .enumerate()
        .map(|(i, d)| Pipeline {
            id: PipelineId::new(i as u32),
            kind: d.kind,
            server_name: buckets[d.bucket].server.to_string(),
            server_slug: buckets[d.bucket].slug.clone(),
            ordinal: d.ordinal,
            tables: d.tables.into_iter().cloned().collect(),
            target: target.clone(),
        })
        .collect();

    let pipeline_count = pipelines.len();
    let gateways = pack_gateways(pipelines, cfg.gateway_table_cap);
    info!(
        tables = inventory.len(),
        pipelines = pipeline_count,
        gateways = gateways.len(),
        "allocation complete"
    );

    Ok(Plan { gateways })
}

/// Split out priority tables (input order, tagged with their server's bucket)
/// and bucket the rest by server in first-seen order across the whole inventory.
fn partition(
    inventory: &[TableRecord],
    large_threshold: u64,
) -> (Vec<(usize, &TableRecord)>, Vec<ServerBucket<'_>>) {
    let mut priority = Vec::new();
    let mut buckets: Vec<ServerBucket<'_>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut slugs: HashSet<String> = HashSet::new();

    for t in inventory {
        let slot = *index.entry(&t.server_name).or_insert_with(|| {
            buckets.push(ServerBucket {
                server: &t.server_name,
                slug: unique_slug(&t.server_name, &mut slugs),
                large: Vec::new(),
                small: Vec::new(),
            });
            buckets.len() - 1
        });

        if t.priority_flag {
            priority.push((slot, t));
        } else if t.row_count >= large_threshold {
            buckets[slot].large.push(t);
        } else {
            buckets[slot].small.push(t);
        }
    }
    (priority, buckets)
}

/// Sanitized server name, suffixed `_2`, `_3`, ... when an earlier server
/// already claimed it.
fn unique_slug(server: &str, taken: &mut HashSet<String>) -> String {
    let base = sanitize(server);
    let mut slug = base.clone();
    let mut n = 1u32;
    while taken.contains(&slug) {
        n += 1;
        slug = format!("{base}_{n}");
    }
    if n > 1 {
        debug!(server, slug = %slug, "server name collides after sanitizing");
    }
    taken.insert(slug.clone());
    slug
}

/// Deal `tables` round-robin over `ceil(len / cap)` groups so group sizes
/// differ by at most one. Empty input yields no groups.
fn spread_evenly<'a>(tables: &[&'a TableRecord], cap: usize) -> Vec<Vec<&'a TableRecord>> {
    if tables.is_empty() {
        return Vec::new();
    }
    let n = tables.len().div_ceil(cap);
    let mut groups: Vec<Vec<&TableRecord>> = (0..n)
        .map(|_| Vec::with_capacity(tables.len().div_ceil(n)))
        .collect();
    for (i, t) in tables.iter().enumerate() {
        groups[i % n].push(*t);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingestplan_core::error::Error;

    fn table(server: &str, name: &str, rows: u64) -> TableRecord {
        TableRecord::new(server, format!("{server}_conn"), "db", "dbo", name).with_rows(rows)
    }

    fn names(p: &Pipeline) -> Vec<&str> {
        p.tables.iter().map(|t| t.table_name.as_str()).collect()
    }

    fn kinds(plan: &Plan) -> Vec<PipelineKind> {
        plan.pipelines().map(|p| p.kind).collect()
    }

    #[test]
    fn empty_inventory_is_empty_plan() {
        let plan = allocate(&[], &AllocationConfig::default()).unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.pipeline_count(), 0);
    }

    #[test]
    fn invalid_config_wins_over_inventory() {
        let err = allocate(&[table("s", "a", 1)], &AllocationConfig::with_caps(10, 5)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        let err = allocate(&[], &AllocationConfig::with_caps(10, 5)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn round_robin_not_fill_in_order() {
        let large: Vec<TableRecord> = (0..5).map(|i| table("s", &format!("L{i}"), 100)).collect();
        let cfg = AllocationConfig::with_caps(3, 10).with_large_threshold(100);
        let plan = allocate(&large, &cfg).unwrap();
        let ps: Vec<&Pipeline> = plan.pipelines().collect();
        assert_eq!(ps.len(), 2);
        assert_eq!(names(ps[0]), vec!["L0", "L2", "L4"]);
        assert_eq!(names(ps[1]), vec!["L1", "L3"]);
        assert_eq!((ps[0].ordinal, ps[1].ordinal), (1, 2));
    }

    #[test]
    fn threshold_zero_makes_everything_large() {
        let inv: Vec<TableRecord> = (0..4).map(|i| table("s", &format!("t{i}"), 0)).collect();
        let cfg = AllocationConfig::with_caps(2, 10).with_large_threshold(0);
        let plan = allocate(&inv, &cfg).unwrap();
        assert_eq!(kinds(&plan), vec![PipelineKind::Large, PipelineKind::Large]);
    }

    #[test]
    fn unknown_row_count_is_small() {
        let inv = vec![table("s", "unknown", 0), table("s", "big", 500)];
        let cfg = AllocationConfig::with_caps(5, 10).with_large_threshold(500);
        let plan = allocate(&inv, &cfg).unwrap();
        let ps: Vec<&Pipeline> = plan.pipelines().collect();
        assert_eq!(ps[0].kind, PipelineKind::Large);
        assert_eq!(names(ps[0]), vec!["big"]);
        assert_eq!(ps[1].kind, PipelineKind::Normal);
        assert_eq!(names(ps[1]), vec!["unknown"]);
    }

    #[test]
    fn concatenation_order_and_server_order() {
        // Server order is first appearance anywhere, including priority rows.
        let inv = vec![
            table("b", "b_small", 1),
            table("a", "a_prio", 1).with_priority(true),
            table("a", "a_big", 1_000),
            table("b", "b_big", 1_000),
            table("a", "a_small", 1),
        ];
        let cfg = AllocationConfig::with_caps(10, 100).with_large_threshold(1_000);
        let plan = allocate(&inv, &cfg).unwrap();
        let order: Vec<(PipelineKind, &str)> = plan
            .pipelines()
            .map(|p| (p.kind, p.server_name.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (PipelineKind::Priority, "a"),
                (PipelineKind::Large, "b"),
                (PipelineKind::Large, "a"),
                (PipelineKind::Normal, "b"),
                (PipelineKind::Normal, "a"),
            ]
        );
        let ids: Vec<u32> = plan.pipelines().map(|p| p.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn priority_ignores_size_and_counts_ordinals_per_server() {
        let inv = vec![
            table("s", "p1", 10_000).with_priority(true),
            table("t", "p2", 0).with_priority(true),
            table("s", "p3", 5).with_priority(true),
        ];
        let plan = allocate(&inv, &AllocationConfig::with_caps(2, 2)).unwrap();
        assert_eq!(plan.pipeline_count(), 3);
        assert_eq!(plan.gateways.len(), 2);
        let ordinals: Vec<u32> = plan.pipelines().map(|p| p.ordinal).collect();
        assert_eq!(ordinals, vec![1, 1, 2]);
        assert!(plan.pipelines().all(|p| p.kind == PipelineKind::Priority));
    }

    #[test]
    fn connection_and_target_pass_through() {
        let mut cfg = AllocationConfig::with_caps(5, 5);
        cfg.defaults.destination_catalog_default = "bronze".into();
        let plan = allocate(&[table("sql01", "a", 1)], &cfg).unwrap();
        let p = plan.pipelines().next().unwrap();
        assert_eq!(p.connection_names(), vec!["sql01_conn"]);
        assert_eq!(p.target.destination_catalog, "bronze");
        assert_eq!(p.target.source_type, "SQLSERVER");
    }

    #[test]
    fn one_server_may_use_several_connections() {
        let mut b = table("sql01", "b", 1);
        b.connection_name = "conn_b".into();
        let inv = vec![table("sql01", "a", 1), b];
        let plan = allocate(&inv, &AllocationConfig::default()).unwrap();
        assert_eq!(plan.pipeline_count(), 1);
        let p = plan.pipelines().next().unwrap();
        assert_eq!(p.connection_names(), vec!["sql01_conn", "conn_b"]);
    }

    #[test]
    fn colliding_server_slugs_get_suffixes() {
        let inv = vec![
            table("SQL-01", "a", 1),
            table("sql_01", "b", 1),
            table("sql_01_2", "c", 1),
            table("sql.01", "d", 1).with_priority(true),
        ];
        let plan = allocate(&inv, &AllocationConfig::with_caps(5, 10)).unwrap();
        let mut names: Vec<String> = plan.pipelines().map(Pipeline::name).collect();
        assert_eq!(
            names,
            vec![
                "sql_01_3_priority_001",
                "sql_01_normal_001",
                "sql_01_2_normal_001",
                "sql_01_2_2_normal_001",
            ]
        );
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }

    #[test]
    fn spread_evenly_sizes() {
        let owned: Vec<TableRecord> = (0..7).map(|i| table("s", &format!("t{i}"), 0)).collect();
        let refs: Vec<&TableRecord> = owned.iter().collect();
        let sizes: Vec<usize> = spread_evenly(&refs, 3).iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![3, 2, 2]);
        assert!(spread_evenly(&[], 3).is_empty());
        assert_eq!(spread_evenly(&refs[..1], 150).len(), 1);
    }
}
