//! Inventory fixtures shared by the integration tests.
#![allow(dead_code)]

use ingestplan_core::table::TableRecord;

/// Seeded linear congruential generator (PCG multiplier) for reproducible fixtures.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(6364136223846793005).wrapping_add(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

pub fn table(server: &str, name: &str, rows: u64, priority: bool) -> TableRecord {
    TableRecord::new(server, format!("{server}_conn"), "erp", "dbo", name)
        .with_rows(rows)
        .with_priority(priority)
}

/// `total` tables on one server: the first `priority` are flagged, the next
/// `large` get `large_rows` rows, the rest get a small count.
pub fn single_server_inventory(
    total: usize,
    priority: usize,
    large: usize,
    large_rows: u64,
) -> Vec<TableRecord> {
    (0..total)
        .map(|i| {
            let rows = if i >= priority && i < priority + large {
                large_rows
            } else {
                1_000 + i as u64
            };
            table("sql01", &format!("t{i:04}"), rows, i < priority)
        })
        .collect()
}

/// Random inventory across `servers` servers with a mix of priority and large tables.
pub fn random_inventory(seed: u64, tables: usize, servers: usize) -> Vec<TableRecord> {
    let mut rng = Lcg::new(seed);
    (0..tables)
        .map(|i| {
            let server = format!("sql{:02}", rng.below(servers as u64));
            let rows = match rng.below(10) {
                0 => 0,
                1 | 2 => 50_000_000 + rng.below(1_000_000_000),
                _ => rng.below(10_000_000),
            };
            table(&server, &format!("t{i:05}"), rows, rng.below(40) == 0)
        })
        .collect()
}

pub fn inventory_csv(tables: &[TableRecord]) -> String {
    let mut out = String::from(
        "server_name,connection_name,database_name,schema_name,table_name,row_count,priority_flag\n",
    );
    for t in tables {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            t.server_name,
            t.connection_name,
            t.database_name,
            t.schema_name,
            t.table_name,
            t.row_count,
            u8::from(t.priority_flag)
        ));
    }
    out
}
