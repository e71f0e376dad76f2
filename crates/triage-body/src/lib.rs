//! Body mechanics for the wound triage engine.
//!
//! Everything here answers "how well does this body work" questions over an
//! immutable damage snapshot. The engine in `triage-core` only talks to the
//! traits in [`physiology`]; the rest are reference implementations a host
//! can use or replace.
//!
//! # Modules
//!
//! - [`damage`] -- Immutable per-part damage snapshots and counterfactuals
//! - [`physiology`] -- Capacity and immune collaborator traits
//! - [`reference`] -- Tag-driven reference physiology
//! - [`anatomy`] -- Reference humanoid and quadruped bodies
//! - [`regeneration`] -- Blood-loss recovery scaled by regeneration sources
//! - [`config`] -- Tunables for capacity formulas and recovery

pub mod anatomy;
pub mod config;
pub mod damage;
pub mod physiology;
pub mod reference;
pub mod regeneration;

pub use config::{PhysiologyConfig, RegenerationConfig};
pub use damage::DamageState;
pub use physiology::{
    CapacityModel, DailyProgression, ImmuneModel, LimbEfficiency, LimbTags, Physiology,
};
pub use reference::ReferencePhysiology;
pub use regeneration::{
    BloodRecovery, BuiltInRegeneration, ComponentRegeneration, NoRegeneration,
    RegenerationComponent, RegenerationContext, RegenerationProvider, blood_recovery,
    natural_healing_factor,
};
