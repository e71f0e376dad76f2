//! Capacity impact model: which tags matter to a capacity, and how much.
//!
//! Each factor is an efficiency from the capacity model turned into
//! `1 - min(1, efficiency)`: the worse a system already works, the more the
//! parts still supporting it are worth. A fixed table then spreads those
//! factors over tags, including cross-capacity side effects (an agent that
//! cannot breathe loses consciousness too).

use triage_body::{CapacityModel, DamageState, LimbTags, PhysiologyConfig};
use triage_types::{BodyPartTag, Capacity};

use crate::pass::TagWeightTable;

/// Share of a vital system's factor passed on to the capacities it feeds.
const VITAL_SIDE_EFFECT: f32 = 0.2;

/// Share of blood filtration's factor passed on to consciousness.
const FILTRATION_SIDE_EFFECT: f32 = 0.1;

fn weight(efficiency: f32) -> f32 {
    1.0 - efficiency.min(1.0)
}

/// Lazily evaluated weight factors over one damage state.
struct Factors<'s, 'a, P: ?Sized> {
    state: &'s DamageState<'a>,
    physiology: &'s P,
    config: &'s PhysiologyConfig,
}

impl<P: CapacityModel + ?Sized> Factors<'_, '_, P> {
    /// Organs: no per-part cap.
    fn source(&self, tag: BodyPartTag) -> f32 {
        weight(self.physiology.tag_efficiency(self.state, tag, f32::MAX, None))
    }

    /// Airways, cages, and tongues: each part capped at full efficiency.
    fn pathway(&self, tag: BodyPartTag) -> f32 {
        weight(self.physiology.tag_efficiency(self.state, tag, 1.0, None))
    }

    /// Paired sense organs: best part weighted.
    fn sense(&self, tag: BodyPartTag) -> f32 {
        weight(self.physiology.tag_efficiency(
            self.state,
            tag,
            f32::MAX,
            Some(self.config.sense_best_part_weight),
        ))
    }

    /// Limb sets: useless when fewer than half the limbs work.
    fn limbs(&self, tags: LimbTags, appendage_weight: f32) -> f32 {
        let limbs = self
            .physiology
            .limb_efficiency(self.state, tags, appendage_weight);
        if limbs.functional_fraction < self.config.limb_function_cutoff {
            return weight(0.0);
        }
        weight(limbs.efficiency)
    }

    fn add_breathing(&self, table: &mut TagWeightTable, share: f32) {
        table.insert(BodyPartTag::BreathingSource, self.source(BodyPartTag::BreathingSource) * share);
        table.insert(BodyPartTag::BreathingPathway, self.pathway(BodyPartTag::BreathingPathway) * share);
        table.insert(
            BodyPartTag::BreathingSourceCage,
            self.pathway(BodyPartTag::BreathingSourceCage) * share,
        );
    }

    fn add_filtration(&self, table: &mut TagWeightTable, share: f32) {
        if self.state.body().has_part_with_tag(BodyPartTag::BloodFiltrationKidney) {
            for tag in [BodyPartTag::BloodFiltrationKidney, BodyPartTag::BloodFiltrationLiver] {
                table.insert(tag, self.source(tag) * share);
            }
        } else {
            let tag = BodyPartTag::BloodFiltrationSource;
            table.insert(tag, self.source(tag) * share);
        }
    }

    fn add_consciousness(&self, table: &mut TagWeightTable) {
        let tag = BodyPartTag::ConsciousnessSource;
        table.insert(tag, self.source(tag));
    }
}

/// Build the tag-weight table of `capacity` for the given damage.
///
/// Capacities without a mapping yield an empty table.
pub fn tag_weights<P: CapacityModel + ?Sized>(
    capacity: Capacity,
    state: &DamageState<'_>,
    physiology: &P,
    config: &PhysiologyConfig,
) -> TagWeightTable {
    let factors = Factors {
        state,
        physiology,
        config,
    };
    let mut table = TagWeightTable::new();

    match capacity {
        Capacity::Consciousness => {
            factors.add_consciousness(&mut table);
            table.insert(
                BodyPartTag::BloodPumpingSource,
                factors.source(BodyPartTag::BloodPumpingSource) * VITAL_SIDE_EFFECT,
            );
            factors.add_breathing(&mut table, VITAL_SIDE_EFFECT);
            factors.add_filtration(&mut table, FILTRATION_SIDE_EFFECT);
        }
        Capacity::Breathing => factors.add_breathing(&mut table, 1.0),
        Capacity::BloodPumping => {
            let tag = BodyPartTag::BloodPumpingSource;
            table.insert(tag, factors.source(tag));
        }
        Capacity::BloodFiltration => factors.add_filtration(&mut table, 1.0),
        Capacity::Metabolism => {
            let tag = BodyPartTag::MetabolismSource;
            table.insert(tag, factors.source(tag));
        }
        Capacity::Hearing => {
            let tag = BodyPartTag::HearingSource;
            table.insert(tag, factors.sense(tag));
        }
        Capacity::Sight => {
            let tag = BodyPartTag::SightSource;
            table.insert(tag, factors.sense(tag));
        }
        Capacity::Talking => {
            table.insert(BodyPartTag::TalkingSource, factors.source(BodyPartTag::TalkingSource));
            table.insert(BodyPartTag::TalkingPathway, factors.pathway(BodyPartTag::TalkingPathway));
            table.insert(BodyPartTag::Tongue, factors.pathway(BodyPartTag::Tongue));
            factors.add_consciousness(&mut table);
        }
        Capacity::Eating => {
            table.insert(BodyPartTag::EatingSource, factors.source(BodyPartTag::EatingSource));
            table.insert(BodyPartTag::EatingPathway, factors.pathway(BodyPartTag::EatingPathway));
            table.insert(
                BodyPartTag::Tongue,
                factors.pathway(BodyPartTag::Tongue) * config.eating_tongue_weight,
            );
            factors.add_consciousness(&mut table);
        }
        Capacity::Manipulation => {
            let appendage = config.manipulation_appendage_weight;
            let limbs = factors.limbs(LimbTags::MANIPULATION, appendage);
            table.insert(BodyPartTag::ManipulationLimbCore, limbs);
            table.insert(BodyPartTag::ManipulationLimbSegment, limbs);
            table.insert(BodyPartTag::ManipulationLimbDigit, limbs * appendage);
            factors.add_consciousness(&mut table);
        }
        Capacity::Moving => {
            let appendage = config.moving_appendage_weight;
            let limbs = factors.limbs(LimbTags::MOVING, appendage);
            table.insert(BodyPartTag::MovingLimbCore, limbs);
            table.insert(BodyPartTag::MovingLimbSegment, limbs);
            table.insert(BodyPartTag::MovingLimbDigit, limbs * appendage);
            table.insert(BodyPartTag::Pelvis, factors.source(BodyPartTag::Pelvis));
            table.insert(BodyPartTag::Spine, factors.source(BodyPartTag::Spine));
            table.insert(
                BodyPartTag::BloodPumpingSource,
                factors.source(BodyPartTag::BloodPumpingSource) * config.moving_vital_weight,
            );
            factors.add_breathing(&mut table, config.moving_vital_weight);
            factors.add_consciousness(&mut table);
        }
    }

    tracing::trace!(%capacity, tags = table.len(), "Built tag weight table");
    table
}
