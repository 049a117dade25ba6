#![forbid(unsafe_code)]
//! ingestplan-core: the data model shared by the allocator, the IO layer and the CLI.
//!
//! - `table`: inventory rows and their identity key.
//! - `plan`: pipelines, gateways and the plan that groups them.
//! - `config`: allocation parameters plus pass-through render defaults.
//! - `error`: the error taxonomy surfaced to callers.
//!
//! No I/O and no logging here.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod plan;
pub mod prelude;
pub mod table;

pub use config::{AllocationConfig, RenderDefaults};
pub use error::{Error, Result};
pub use plan::{Gateway, Pipeline, PipelineKind, PipelineTarget, Plan};
pub use table::{TableKey, TableRecord};

/// Crate version, stamped into rendered bundles for provenance.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
