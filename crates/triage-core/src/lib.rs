//! Wound triage: which injury an agent should have treated next.
//!
//! The host calls [`Triage::select_most_urgent_injury`] once per treatment
//! opportunity with the agent, its untreated injuries, and a physiology
//! model. The engine reads the agent, never mutates it, and answers with a
//! [`TriageDecision`] naming the injury and the tier that chose it.
//!
//! # Modules
//!
//! - [`triage`] -- Tiered policy and random fallback
//! - [`impact`] -- Per-capacity tag-weight tables
//! - [`counterfactual`] -- Worst offender against a capacity
//! - [`criticality`] -- Injured part closest to death
//! - [`survival`] -- Immune race forecast
//! - [`pass`] -- Pass-scoped snapshot and caches
//! - [`config`] -- Policy thresholds and YAML loading

pub mod config;
pub mod counterfactual;
pub mod criticality;
pub mod impact;
pub mod pass;
pub mod survival;
pub mod triage;

pub use config::{ConfigError, TriageConfig};
pub use counterfactual::most_impactful_injury;
pub use criticality::{closest_to_death_injury, part_capacity_weight};
pub use impact::tag_weights;
pub use pass::{CapacityValueCache, ChildPartIndex, Pass, TagWeightCache, TagWeightTable};
pub use survival::{most_severe_immunizable, will_survive_disease};
pub use triage::{Tier, Triage, TriageDecision};
