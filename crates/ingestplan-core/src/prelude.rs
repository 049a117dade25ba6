//! Convenient re-exports for downstream crates.

pub use crate::config::{AllocationConfig, RenderDefaults};
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::{GatewayId, PipelineId};
pub use crate::plan::{Gateway, Pipeline, PipelineKind, PipelineTarget, Plan};
pub use crate::table::{TableKey, TableRecord};
