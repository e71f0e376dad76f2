//! Collaborator interfaces consumed by the triage engine.
//!
//! The host owns the real capacity formulas and immune model. The engine
//! only reads them through these traits:
//!
//! - [`CapacityModel`] -- capacity levels, tag efficiencies, and limb-chain
//!   efficiencies over a [`DamageState`].
//! - [`ImmuneModel`] -- daily immunity and severity deltas for a condition.
//!
//! [`ReferencePhysiology`](crate::reference::ReferencePhysiology) implements
//! both for tests and for hosts without their own model.

use triage_types::{Agent, BodyPartTag, Capacity, Condition};

use crate::config::PhysiologyConfig;
use crate::damage::DamageState;

/// The three tags that make up one kind of limb chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LimbTags {
    /// Root of each limb (shoulder, leg).
    pub core: BodyPartTag,
    /// Intermediate segments (arm, hand, foot).
    pub segment: BodyPartTag,
    /// Terminal digits (fingers, toes).
    pub digit: BodyPartTag,
}

impl LimbTags {
    /// Arms and hands.
    pub const MANIPULATION: Self = Self {
        core: BodyPartTag::ManipulationLimbCore,
        segment: BodyPartTag::ManipulationLimbSegment,
        digit: BodyPartTag::ManipulationLimbDigit,
    };

    /// Legs and feet.
    pub const MOVING: Self = Self {
        core: BodyPartTag::MovingLimbCore,
        segment: BodyPartTag::MovingLimbSegment,
        digit: BodyPartTag::MovingLimbDigit,
    };
}

/// Result of a limb-chain efficiency query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbEfficiency {
    /// Mean efficiency across all limbs of the set.
    pub efficiency: f32,
    /// Fraction of limbs with any function left (0.0 to 1.0).
    pub functional_fraction: f32,
}

/// Daily immune race rates for one condition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyProgression {
    /// Immunity gained per day.
    pub immunity_per_day: f32,
    /// Severity gained per day while untreated.
    pub severity_per_day: f32,
}

/// Capacity calculations over a body's damage state.
///
/// Every method must be a pure function of its inputs: the engine calls
/// them on hypothetical states and relies on the results not depending on
/// anything else.
pub trait CapacityModel {
    /// Level of `capacity` in `[0, 1]` for the given damage.
    fn capacity_level(&self, state: &DamageState<'_>, capacity: Capacity) -> f32;

    /// Combined efficiency of every part carrying `tag`.
    ///
    /// Each part's efficiency is capped at `maximum`. With
    /// `best_part_weight`, the best part gets that share of the result and
    /// the others split the remainder. Bodies without the tag report 1.0.
    fn tag_efficiency(
        &self,
        state: &DamageState<'_>,
        tag: BodyPartTag,
        maximum: f32,
        best_part_weight: Option<f32>,
    ) -> f32;

    /// Efficiency of a symmetric limb set and how many limbs still work.
    fn limb_efficiency(
        &self,
        state: &DamageState<'_>,
        limb: LimbTags,
        appendage_weight: f32,
    ) -> LimbEfficiency;

    /// Tunables the model computes with, if it carries its own.
    ///
    /// When present, the engine derives its tag-weight factors from the
    /// same values so both sides agree on appendage and sense weights.
    fn tunables(&self) -> Option<&PhysiologyConfig> {
        None
    }
}

/// Immune progression queries.
pub trait ImmuneModel {
    /// Daily rates for `condition` on `agent`, `None` when the condition
    /// has no immunity component.
    fn progression(&self, agent: &Agent, condition: &Condition) -> Option<DailyProgression>;
}

/// Everything the triage engine needs from the host.
pub trait Physiology: CapacityModel + ImmuneModel {}

impl<T: CapacityModel + ImmuneModel> Physiology for T {}
