//! Strongly-typed identifiers for plan entities.
//!
//! Ids are positions in plan order, so the same inventory always yields the same ids.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `new_id!(Name, "label")` defines a `u32` position newtype that displays as
/// `label#n`.
macro_rules! new_id {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const fn new(v: u32) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

new_id!(PipelineId, "pipeline");
new_id!(GatewayId, "gateway");
