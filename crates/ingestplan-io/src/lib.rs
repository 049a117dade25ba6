#![forbid(unsafe_code)]
//! ingestplan-io: everything around the allocator that touches bytes.
//!
//! - `inventory`: CSV → `Vec<TableRecord>`.
//! - `config_doc`: optional YAML config overrides.
//! - `render`: `Plan` → YAML documents (one per pipeline, one per gateway, one schema list).
//! - `sink` / `memory_sink`: where rendered documents go.
//! - `bundle`: render + write + manifest in one call.
//!
//! Connection lookups against a live workspace are not done here.

pub mod bundle;
pub mod config_doc;
pub mod error;
pub mod inventory;
pub mod memory_sink;
pub mod render;
pub mod sink;

pub use bundle::{write_bundle, BundleManifest};
pub use config_doc::{parse_config_yaml, ConfigDoc};
pub use error::{Error, Result};
pub use inventory::{read_inventory, read_inventory_path};
pub use memory_sink::MemoryBundleSink;
pub use render::{render_plan, RenderedDocument};
pub use sink::{BundleSink, FsBundleSink};
