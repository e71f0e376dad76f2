//! Error types for the `triage-types` crate.

use crate::ids::PartIndex;

/// Errors that can occur while assembling a body topology.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The requested parent does not exist in the body under construction.
    #[error("unknown parent part {parent} for '{label}'")]
    UnknownParent {
        /// The missing parent index.
        parent: PartIndex,
        /// Label of the part being attached.
        label: String,
    },

    /// A maximum health value was negative, NaN, or infinite.
    #[error("invalid max health {max_health} for '{label}'")]
    InvalidMaxHealth {
        /// Label of the offending part.
        label: String,
        /// The rejected value.
        max_health: f32,
    },

    /// The referenced part does not exist.
    #[error("part not found: {0}")]
    PartNotFound(PartIndex),
}
