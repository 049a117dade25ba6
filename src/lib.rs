#![forbid(unsafe_code)]
//! ingestplan: allocate an inventory of source tables into pipelines and gateways.
//!
//! Umbrella crate over the workspace members:
//! - [`model`]: data model, config, errors.
//! - [`planner`]: the allocator.
//! - [`io`]: inventory CSV, config documents, YAML rendering.

pub use ingestplan_core as model;
pub use ingestplan_io as io;
pub use ingestplan_planner as planner;

pub use ingestplan_core::prelude::*;
pub use ingestplan_planner::allocate;
