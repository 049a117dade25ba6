//! Gateway packing (phase 4).

use ingestplan_core::id::GatewayId;
use ingestplan_core::plan::{Gateway, Pipeline};

/// Pack pipelines, in the given order, into gateways of at most
/// `gateway_table_cap` tables. A pipeline joins the open gateway when it fits
/// the remaining capacity; otherwise the gateway is closed and a new one opened.
///
/// Callers guarantee every pipeline holds at most `gateway_table_cap` tables,
/// so an empty gateway always accepts the next pipeline.
pub fn pack_gateways(pipelines: Vec<Pipeline>, gateway_table_cap: usize) -> Vec<Gateway> {
    let mut gateways: Vec<Gateway> = Vec::new();
    let mut open: Vec<Pipeline> = Vec::new();
    let mut load = 0usize;

    for p in pipelines {
        let n = p.table_count();
        if !open.is_empty() && load + n > gateway_table_cap {
            gateways.push(Gateway {
                id: GatewayId::new(gateways.len() as u32),
                pipelines: std::mem::take(&mut open),
            });
            load = 0;
        }
        load += n;
        open.push(p);
    }

    if !open.is_empty() {
        gateways.push(Gateway {
            id: GatewayId::new(gateways.len() as u32),
            pipelines: open,
        });
    }
    gateways
}
