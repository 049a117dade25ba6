#![forbid(unsafe_code)]
//! ingestplan-planner: inventory + caps → `Plan`.
//!
//! The allocator runs four phases over a validated inventory:
//! 1. every priority table gets a dedicated pipeline,
//! 2. large tables are dealt round-robin over `ceil(L / cap)` pipelines per server,
//! 3. remaining tables fill `normal` pipelines per server in input order,
//! 4. the concatenated pipelines are packed into gateways.
//!
//! Pure and synchronous: no I/O, no shared state. Safe to call from many threads.

pub mod allocate;
pub mod gateway;
pub mod summary;
pub mod validate;
pub mod verify;

pub use allocate::allocate;
pub use gateway::pack_gateways;
pub use summary::{summarize, PlanSummary};
pub use validate::{validate_config, validate_inventory};
