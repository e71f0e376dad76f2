//! Shared type definitions for the wound triage engine.
//!
//! This crate is the single source of truth for the data the host hands to
//! the triage engine: the agent, its body topology, injuries, and
//! conditions. It holds no decision logic.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifiers for agents, injuries, conditions, parts
//! - [`enums`] -- Capacities, body-part tags, tissue classes, condition kinds
//! - [`body`] -- Arena-backed body tree and its builder
//! - [`structs`] -- Agents, injuries, conditions, and stats
//! - [`error`] -- Topology construction errors

pub mod body;
pub mod enums;
pub mod error;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use body::{Body, BodyBuilder, BodyPart};
pub use enums::{BodyPartTag, Capacity, ConditionKind, TissueClass};
pub use error::TopologyError;
pub use ids::{AgentId, ConditionId, InjuryId, PartIndex};
pub use structs::{
    Agent, AgentStats, Condition, ConditionStage, Immunizable, Injury, Needs, Tending,
};
