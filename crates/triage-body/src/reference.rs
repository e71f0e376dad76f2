//! Reference implementation of the physiology collaborators.
//!
//! Capacity levels are composed from tag and limb efficiencies the way the
//! host game's capacity workers do it:
//!
//! | Capacity | Formula |
//! |---|---|
//! | Consciousness | brain |
//! | Breathing | lungs x airway x ribcage |
//! | Blood pumping | heart |
//! | Blood filtration | kidneys x liver, or generic filter |
//! | Metabolism | stomach |
//! | Sight / Hearing | eyes / ears, best-part weighted |
//! | Talking | voice x throat x tongue x consciousness |
//! | Eating | jaw x throat x tongue (half weight) x consciousness |
//! | Manipulation | arm chains x consciousness |
//! | Moving | leg chains (cut off below half) x pelvis x spine x vitals x consciousness |
//!
//! All levels are clamped to `[0, 1]`.

use triage_types::{Agent, BodyPartTag, Capacity, Condition};

use crate::config::PhysiologyConfig;
use crate::damage::DamageState;
use crate::physiology::{CapacityModel, DailyProgression, ImmuneModel, LimbEfficiency, LimbTags};

/// Linear interpolation from `from` to `to` by `t`.
fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (to - from).mul_add(t, from)
}

/// Physiology driven entirely by the body tree and the agent's stats.
#[derive(Debug, Clone, Default)]
pub struct ReferencePhysiology {
    config: PhysiologyConfig,
}

impl ReferencePhysiology {
    /// Create a reference physiology with the given tunables.
    pub const fn new(config: PhysiologyConfig) -> Self {
        Self { config }
    }

    /// The tunables in use.
    pub const fn config(&self) -> &PhysiologyConfig {
        &self.config
    }

    fn source(&self, state: &DamageState<'_>, tag: BodyPartTag) -> f32 {
        self.tag_efficiency(state, tag, f32::MAX, None)
    }

    fn pathway(&self, state: &DamageState<'_>, tag: BodyPartTag) -> f32 {
        self.tag_efficiency(state, tag, 1.0, None)
    }

    fn sense(&self, state: &DamageState<'_>, tag: BodyPartTag) -> f32 {
        self.tag_efficiency(state, tag, f32::MAX, Some(self.config.sense_best_part_weight))
    }

    fn raw_level(&self, state: &DamageState<'_>, capacity: Capacity) -> f32 {
        match capacity {
            Capacity::Consciousness => self.source(state, BodyPartTag::ConsciousnessSource),
            Capacity::Breathing => {
                self.source(state, BodyPartTag::BreathingSource)
                    * self.pathway(state, BodyPartTag::BreathingPathway)
                    * self.pathway(state, BodyPartTag::BreathingSourceCage)
            }
            Capacity::BloodPumping => self.source(state, BodyPartTag::BloodPumpingSource),
            Capacity::BloodFiltration => {
                if state.body().has_part_with_tag(BodyPartTag::BloodFiltrationKidney) {
                    self.source(state, BodyPartTag::BloodFiltrationKidney)
                        * self.source(state, BodyPartTag::BloodFiltrationLiver)
                } else {
                    self.source(state, BodyPartTag::BloodFiltrationSource)
                }
            }
            Capacity::Metabolism => self.source(state, BodyPartTag::MetabolismSource),
            Capacity::Sight => self.sense(state, BodyPartTag::SightSource),
            Capacity::Hearing => self.sense(state, BodyPartTag::HearingSource),
            Capacity::Talking => {
                self.source(state, BodyPartTag::TalkingSource)
                    * self.pathway(state, BodyPartTag::TalkingPathway)
                    * self.pathway(state, BodyPartTag::Tongue)
                    * self.level(state, Capacity::Consciousness)
            }
            Capacity::Eating => {
                let tongue = self.pathway(state, BodyPartTag::Tongue);
                self.source(state, BodyPartTag::EatingSource)
                    * self.pathway(state, BodyPartTag::EatingPathway)
                    * lerp(1.0, tongue, self.config.eating_tongue_weight)
                    * self.level(state, Capacity::Consciousness)
            }
            Capacity::Manipulation => {
                let limbs = self.limb_efficiency(
                    state,
                    LimbTags::MANIPULATION,
                    self.config.manipulation_appendage_weight,
                );
                limbs.efficiency * self.level(state, Capacity::Consciousness)
            }
            Capacity::Moving => {
                let limbs = self.limb_efficiency(
                    state,
                    LimbTags::MOVING,
                    self.config.moving_appendage_weight,
                );
                if limbs.functional_fraction < self.config.limb_function_cutoff {
                    return 0.0;
                }
                let vital = self.config.moving_vital_weight;
                limbs.efficiency
                    * self.source(state, BodyPartTag::Pelvis)
                    * self.source(state, BodyPartTag::Spine)
                    * lerp(1.0, self.level(state, Capacity::Breathing), vital)
                    * lerp(1.0, self.level(state, Capacity::BloodPumping), vital)
                    * self.level(state, Capacity::Consciousness)
            }
        }
    }

    fn level(&self, state: &DamageState<'_>, capacity: Capacity) -> f32 {
        self.raw_level(state, capacity).clamp(0.0, 1.0)
    }
}

impl CapacityModel for ReferencePhysiology {
    fn capacity_level(&self, state: &DamageState<'_>, capacity: Capacity) -> f32 {
        self.level(state, capacity)
    }

    fn tag_efficiency(
        &self,
        state: &DamageState<'_>,
        tag: BodyPartTag,
        maximum: f32,
        best_part_weight: Option<f32>,
    ) -> f32 {
        let mut total = 0.0_f32;
        let mut count = 0.0_f32;
        let mut best = 0.0_f32;

        for part in state.body().parts_with_tag(tag) {
            let efficiency = state.part_efficiency(part).min(maximum);
            total += efficiency;
            count += 1.0;
            best = best.max(efficiency);
        }

        if count <= 0.0 {
            return 1.0;
        }

        match best_part_weight {
            Some(weight) if count >= 2.0 => {
                let others = (total - best) / (count - 1.0);
                best.mul_add(weight, others * (1.0 - weight))
            }
            _ => total / count,
        }
    }

    fn limb_efficiency(
        &self,
        state: &DamageState<'_>,
        limb: LimbTags,
        appendage_weight: f32,
    ) -> LimbEfficiency {
        let body = state.body();
        let mut total = 0.0_f32;
        let mut limbs = 0.0_f32;
        let mut functional = 0.0_f32;

        for core in body.parts_with_tag(limb.core) {
            let mut efficiency = state.part_efficiency(core);
            for segment in body.descendants_with_tag(core, limb.segment) {
                efficiency *= state.part_efficiency(segment);
            }

            let digits = body.descendants_with_tag(core, limb.digit);
            if !digits.is_empty() {
                let mut digit_total = 0.0_f32;
                let mut digit_count = 0.0_f32;
                for digit in digits {
                    digit_total += state.part_efficiency(digit);
                    digit_count += 1.0;
                }
                efficiency *= lerp(1.0, digit_total / digit_count, appendage_weight);
            }

            total += efficiency;
            limbs += 1.0;
            if efficiency > 0.0 {
                functional += 1.0;
            }
        }

        if limbs <= 0.0 {
            return LimbEfficiency {
                efficiency: 0.0,
                functional_fraction: 0.0,
            };
        }

        LimbEfficiency {
            efficiency: total / limbs,
            functional_fraction: functional / limbs,
        }
    }

    fn tunables(&self) -> Option<&PhysiologyConfig> {
        Some(&self.config)
    }
}

impl ImmuneModel for ReferencePhysiology {
    fn progression(&self, agent: &Agent, condition: &Condition) -> Option<DailyProgression> {
        let immunizable = condition.immunizable?;
        Some(DailyProgression {
            immunity_per_day: immunizable.immunity_per_day * agent.stats.immunity_gain_speed,
            severity_per_day: immunizable.severity_per_day,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use triage_types::{ConditionKind, Immunizable, Injury, TissueClass};

    use super::*;
    use crate::anatomy;

    fn human() -> Agent {
        Agent::new("Test Agent", TissueClass::Organic, anatomy::humanoid().unwrap())
    }

    fn level(agent: &Agent, capacity: Capacity) -> f32 {
        ReferencePhysiology::default().capacity_level(&DamageState::of(agent), capacity)
    }

    #[test]
    fn healthy_body_is_at_full_capacity() {
        let agent = human();
        for capacity in Capacity::ALL {
            assert!(
                (level(&agent, capacity) - 1.0).abs() < 1e-5,
                "{capacity} should be full"
            );
        }
    }

    #[test]
    fn damaged_heart_lowers_blood_pumping() {
        let mut agent = human();
        let heart = agent.body.find("heart").unwrap();
        agent.add_injury(Injury::new("stab", heart, 9.0, 0.0));
        let value = level(&agent, Capacity::BloodPumping);
        assert!((value - 0.4).abs() < 1e-5);
    }

    #[test]
    fn losing_one_eye_costs_less_than_half_of_sight() {
        let mut agent = human();
        let eye = agent.body.find("left eye").unwrap();
        agent.add_injury(Injury::new("gouge", eye, 10.0, 0.0));
        let sight = level(&agent, Capacity::Sight);
        assert!((sight - 0.75).abs() < 1e-5);
    }

    #[test]
    fn one_leg_limps_and_none_cannot_walk() {
        let mut agent = human();
        let left = agent.body.find("left leg").unwrap();
        agent.body.set_missing(left, true).unwrap();
        assert!((level(&agent, Capacity::Moving) - 0.5).abs() < 1e-5);

        let right = agent.body.find("right leg").unwrap();
        agent.body.set_missing(right, true).unwrap();
        assert!(level(&agent, Capacity::Moving).abs() < f32::EPSILON);
    }

    #[test]
    fn quadruped_walks_on_two_of_four_legs() {
        let mut agent = Agent::new("Dog", TissueClass::Organic, anatomy::quadruped().unwrap());
        for label in ["front left leg", "rear right leg"] {
            let leg = agent.body.find(label).unwrap();
            agent.body.set_missing(leg, true).unwrap();
        }
        assert!(level(&agent, Capacity::Moving) > 0.0);

        let third = agent.body.find("rear left leg").unwrap();
        agent.body.set_missing(third, true).unwrap();
        assert!(level(&agent, Capacity::Moving).abs() < f32::EPSILON);
    }

    #[test]
    fn consciousness_scales_manipulation() {
        let mut agent = human();
        let brain = agent.body.find("brain").unwrap();
        agent.add_injury(Injury::new("concussion", brain, 5.0, 0.0));
        let manipulation = level(&agent, Capacity::Manipulation);
        assert!((manipulation - 0.5).abs() < 1e-5);
    }

    #[test]
    fn missing_tag_reports_full_efficiency() {
        let agent = Agent::new("Dog", TissueClass::Organic, anatomy::quadruped().unwrap());
        let physiology = ReferencePhysiology::default();
        let state = DamageState::of(&agent);
        let efficiency =
            physiology.tag_efficiency(&state, BodyPartTag::ManipulationLimbCore, f32::MAX, None);
        assert!((efficiency - 1.0).abs() < f32::EPSILON);
        let limbs = physiology.limb_efficiency(&state, LimbTags::MANIPULATION, 0.8);
        assert!(limbs.functional_fraction.abs() < f32::EPSILON);
    }

    #[test]
    fn immune_progression_scales_with_stat() {
        let mut agent = human();
        agent.stats.immunity_gain_speed = 1.5;
        let mut flu = Condition::new("flu", ConditionKind::Disease, 0.4);
        flu.immunizable = Some(Immunizable {
            immunity: 0.2,
            immunity_per_day: 0.2,
            severity_per_day: 0.25,
        });
        let rates = ReferencePhysiology::default()
            .progression(&agent, &flu)
            .unwrap();
        assert!((rates.immunity_per_day - 0.3).abs() < 1e-6);
        assert!((rates.severity_per_day - 0.25).abs() < 1e-6);

        let scratch = Condition::new("bruise", ConditionKind::Other, 0.1);
        assert!(
            ReferencePhysiology::default()
                .progression(&agent, &scratch)
                .is_none()
        );
    }
}
