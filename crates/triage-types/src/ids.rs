//! Type-safe identifier wrappers.
//!
//! Agents, injuries, and conditions are host-owned entities identified by
//! UUID v7 newtypes so they cannot be mixed up at compile time. Body parts
//! live in a per-agent arena and are addressed by [`PartIndex`] instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an agent being triaged.
    AgentId
}

define_id! {
    /// Unique identifier for an injury on an agent's body.
    InjuryId
}

define_id! {
    /// Unique identifier for a condition (disease, blood loss, ...).
    ConditionId
}

/// Position of a body part inside its [`Body`](crate::Body) arena.
///
/// Index 0 is always the root part. Indices are only meaningful for the
/// body they were issued by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartIndex(pub usize);

impl PartIndex {
    /// The root of every body.
    pub const ROOT: Self = Self(0);

    /// Return the raw arena offset.
    pub const fn get(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for PartIndex {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
