//! The tiered triage policy.
//!
//! [`Triage::select_most_urgent_injury`] walks a fixed tier sequence and
//! returns the first hit:
//!
//! 1. Bleeding -- highest bleed-to-severity ratio once total bleeding is
//!    at the threshold.
//! 2. Disease race -- worst offender against blood filtration when the
//!    immune system is losing.
//! 3. Life-critical checkpoints -- at each checkpoint, the most critical
//!    part in range, then the life-critical capacity furthest below it.
//! 4. Functional floors -- walking, then hands; then the late checkpoints.
//! 5. Maximal restoration -- life-critical capacities and parts toward
//!    full, then advisory capacities (logged, terminal only if configured).
//! 6. Random -- uniform pick among the candidates.
//!
//! Every decision carries the [`Tier`] that produced it.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use triage_body::{Physiology, PhysiologyConfig};
use triage_types::{Agent, Capacity, Injury, InjuryId};

use crate::config::TriageConfig;
use crate::counterfactual::most_impactful_injury;
use crate::criticality::closest_to_death_injury;
use crate::pass::Pass;
use crate::survival::will_survive_disease;

/// Tag-weight tunables for a pass: the physiology's own when it carries
/// them, otherwise the `physiology` section of the triage config.
fn tunables<'a, P: Physiology + ?Sized>(
    config: &'a TriageConfig,
    physiology: &'a P,
) -> &'a PhysiologyConfig {
    physiology.tunables().unwrap_or(&config.physiology)
}

/// Severity floor used when normalizing bleed rates.
const MIN_SEVERITY: f32 = 1e-4;

/// The stage of the policy that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Tier {
    /// Total bleeding reached the threshold.
    Bleeding,
    /// The immune system is losing its race.
    DiseaseRace,
    /// Most critical part within a damage checkpoint.
    CriticalPart {
        /// Damage checkpoint in effect.
        checkpoint: f32,
    },
    /// Worst offender against a life-critical capacity below a checkpoint.
    CriticalCapacity {
        /// Level checkpoint in effect.
        checkpoint: f32,
        /// The capacity furthest below it.
        capacity: Capacity,
    },
    /// Worst offender against a capacity below its functional floor.
    Functional {
        /// Moving or manipulation.
        capacity: Capacity,
    },
    /// Worst offender against a non-critical capacity.
    Advisory {
        /// The capacity being restored.
        capacity: Capacity,
    },
    /// No tier applied; picked at random.
    Random,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bleeding => write!(f, "bleeding"),
            Self::DiseaseRace => write!(f, "disease race"),
            Self::CriticalPart { checkpoint } => write!(f, "critical part at {checkpoint}"),
            Self::CriticalCapacity {
                checkpoint,
                capacity,
            } => write!(f, "critical {capacity} below {checkpoint}"),
            Self::Functional { capacity } => write!(f, "functional {capacity}"),
            Self::Advisory { capacity } => write!(f, "advisory {capacity}"),
            Self::Random => write!(f, "random"),
        }
    }
}

/// The injury to treat next and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriageDecision {
    /// The selected injury.
    pub injury: InjuryId,
    /// The tier that selected it.
    pub tier: Tier,
}

/// The triage engine. Holds configuration only; every call runs its own
/// [`Pass`], so one engine can serve many agents and threads.
#[derive(Debug, Clone, Default)]
pub struct Triage {
    config: TriageConfig,
}

impl Triage {
    /// Create an engine with the given policy.
    pub const fn new(config: TriageConfig) -> Self {
        Self { config }
    }

    /// The policy in use.
    pub const fn config(&self) -> &TriageConfig {
        &self.config
    }

    /// Pick the injury among `candidates` that should be treated next.
    ///
    /// Ids that do not name an injury of `agent` are skipped. Returns
    /// `None` only when no candidate remains. Deterministic except for the
    /// final random tier, which draws from `rng`.
    pub fn select_most_urgent_injury<P, R>(
        &self,
        agent: &Agent,
        candidates: &[InjuryId],
        physiology: &P,
        rng: &mut R,
    ) -> Option<TriageDecision>
    where
        P: Physiology + ?Sized,
        R: Rng,
    {
        let injuries = resolve(agent, candidates);
        if injuries.is_empty() {
            return None;
        }

        if let Some(decision) = self.evaluate_resolved(agent, &injuries, physiology) {
            return Some(decision);
        }

        let index = rng.random_range(0..injuries.len());
        let injury = injuries.get(index)?;
        tracing::debug!(
            agent_id = %agent.id,
            injury = %injury.label,
            candidates = injuries.len(),
            "No tier applied, picked at random"
        );
        Some(TriageDecision {
            injury: injury.id,
            tier: Tier::Random,
        })
    }

    /// Run every deterministic tier and return the first hit.
    ///
    /// Unlike [`select_most_urgent_injury`](Self::select_most_urgent_injury)
    /// this never falls back to a random pick.
    pub fn evaluate<P: Physiology + ?Sized>(
        &self,
        agent: &Agent,
        candidates: &[InjuryId],
        physiology: &P,
    ) -> Option<TriageDecision> {
        let injuries = resolve(agent, candidates);
        if injuries.is_empty() {
            return None;
        }
        self.evaluate_resolved(agent, &injuries, physiology)
    }

    fn evaluate_resolved<P: Physiology + ?Sized>(
        &self,
        agent: &Agent,
        injuries: &[&Injury],
        physiology: &P,
    ) -> Option<TriageDecision> {
        let decision = self.tiers(agent, injuries, physiology)?;
        tracing::debug!(
            agent_id = %agent.id,
            injury = %decision.injury,
            tier = %decision.tier,
            "Selected injury"
        );
        Some(decision)
    }

    fn tiers<P: Physiology + ?Sized>(
        &self,
        agent: &Agent,
        injuries: &[&Injury],
        physiology: &P,
    ) -> Option<TriageDecision> {
        let config = &self.config;

        if let Some(injury) = self.bleeding(agent, injuries) {
            return Some(decide(injury, Tier::Bleeding));
        }

        let mut pass = Pass::new(agent, physiology, tunables(config, physiology));

        let losing_race = !will_survive_disease(agent, physiology);
        let disease_pick = if losing_race {
            worst_offender(&mut pass, injuries, Capacity::BloodFiltration)
        } else {
            None
        };
        if let Some(injury) = disease_pick {
            return Some(decide(injury, Tier::DiseaseRace));
        }

        if let Some(decision) = checkpoints(&mut pass, injuries, &config.life_critical_checkpoints) {
            return Some(decision);
        }

        for (capacity, floor) in [
            (Capacity::Moving, config.moving_floor),
            (Capacity::Manipulation, config.manipulation_floor),
        ] {
            if let Some((injury, _)) = furthest_below(&mut pass, injuries, &[capacity], floor) {
                return Some(decide(injury, Tier::Functional { capacity }));
            }
        }

        if let Some(decision) = checkpoints(&mut pass, injuries, &config.late_checkpoints) {
            return Some(decision);
        }

        let full = config.restoration_level;
        let vital = Capacity::life_critical(agent.tissue);
        if let Some((injury, capacity)) = furthest_below(&mut pass, injuries, &vital, full) {
            return Some(decide(
                injury,
                Tier::CriticalCapacity {
                    checkpoint: full,
                    capacity,
                },
            ));
        }
        if let Some(injury) = closest_to_death_injury(&mut pass, injuries, full) {
            return Some(decide(injury, Tier::CriticalPart { checkpoint: full }));
        }

        for &capacity in &config.advisory_capacities {
            let Some((injury, _)) = furthest_below(&mut pass, injuries, &[capacity], full) else {
                continue;
            };
            if config.advisory_terminal {
                return Some(decide(injury, Tier::Advisory { capacity }));
            }
            tracing::debug!(
                agent_id = %agent.id,
                %capacity,
                injury = %injury.label,
                "Advisory restoration candidate, not terminal"
            );
        }

        None
    }

    fn bleeding<'i>(&self, agent: &Agent, injuries: &[&'i Injury]) -> Option<&'i Injury> {
        if !agent.can_bleed() {
            return None;
        }
        let total = agent.bleed_rate_total();
        if total < self.config.bleeding_threshold {
            return None;
        }

        let mut best_ratio = 0.0_f32;
        let mut best = None;
        for &injury in injuries {
            let ratio = injury.bleed_rate / injury.severity.max(MIN_SEVERITY);
            if ratio > best_ratio {
                best_ratio = ratio;
                best = Some(injury);
            }
        }
        tracing::trace!(agent_id = %agent.id, total, best_ratio, "Bleeding tier");
        best
    }
}

fn decide(injury: &Injury, tier: Tier) -> TriageDecision {
    TriageDecision {
        injury: injury.id,
        tier,
    }
}

/// Look up candidate ids on the agent, keeping candidate order.
fn resolve<'a>(agent: &'a Agent, candidates: &[InjuryId]) -> Vec<&'a Injury> {
    let mut injuries = Vec::with_capacity(candidates.len());
    for &id in candidates {
        match agent.injury(id) {
            Some(injury) if !injuries.iter().any(|known: &&Injury| known.id == id) => {
                injuries.push(injury);
            }
            Some(_) => {}
            None => tracing::warn!(agent_id = %agent.id, injury = %id, "Unknown injury id, skipped"),
        }
    }
    injuries
}

fn worst_offender<'i, P: Physiology + ?Sized>(
    pass: &mut Pass<'_, P>,
    injuries: &[&'i Injury],
    capacity: Capacity,
) -> Option<&'i Injury> {
    most_impactful_injury(&pass.state, injuries, capacity, &mut pass.values, pass.physiology)
}

/// Worst offender against whichever of `capacities` is furthest below
/// `level`. Capacities at or above `level` are ignored, as are capacities
/// no candidate would improve.
fn furthest_below<'i, P: Physiology + ?Sized>(
    pass: &mut Pass<'_, P>,
    injuries: &[&'i Injury],
    capacities: &[Capacity],
    level: f32,
) -> Option<(&'i Injury, Capacity)> {
    let mut lowest = level;
    let mut best = None;
    for &capacity in capacities {
        let value = pass.level(capacity);
        if value >= lowest {
            continue;
        }
        if let Some(injury) = worst_offender(pass, injuries, capacity) {
            lowest = value;
            best = Some((injury, capacity));
        }
    }
    best
}

/// Sweep damage checkpoints: critical part first, then critical capacity.
fn checkpoints<P: Physiology + ?Sized>(
    pass: &mut Pass<'_, P>,
    injuries: &[&Injury],
    checkpoints: &[f32],
) -> Option<TriageDecision> {
    let vital = Capacity::life_critical(pass.agent.tissue);
    for &checkpoint in checkpoints {
        if let Some(injury) = closest_to_death_injury(pass, injuries, checkpoint) {
            return Some(decide(injury, Tier::CriticalPart { checkpoint }));
        }
        if let Some((injury, capacity)) = furthest_below(pass, injuries, &vital, checkpoint) {
            return Some(decide(
                injury,
                Tier::CriticalCapacity {
                    checkpoint,
                    capacity,
                },
            ));
        }
    }
    None
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use triage_body::{
        CapacityModel, DailyProgression, DamageState, ImmuneModel, LimbEfficiency, LimbTags,
        ReferencePhysiology, anatomy,
    };
    use triage_types::{BodyPartTag, Condition, TissueClass};

    use super::*;

    fn human() -> Agent {
        Agent::new("Test Agent", TissueClass::Organic, anatomy::humanoid().unwrap())
    }

    fn select(triage: &Triage, agent: &Agent) -> Option<TriageDecision> {
        let ids: Vec<InjuryId> = agent.injuries.iter().map(|injury| injury.id).collect();
        let mut rng = SmallRng::seed_from_u64(7);
        triage.select_most_urgent_injury(agent, &ids, &ReferencePhysiology::default(), &mut rng)
    }

    #[test]
    fn no_candidates_no_decision() {
        let agent = human();
        assert_eq!(select(&Triage::default(), &agent), None);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let mut agent = human();
        let arm = agent.body.find("left arm").unwrap();
        let cut = agent.add_injury(Injury::new("cut", arm, 2.0, 0.0));
        let mut rng = SmallRng::seed_from_u64(1);
        let decision = Triage::default()
            .select_most_urgent_injury(
                &agent,
                &[InjuryId::new(), cut],
                &ReferencePhysiology::default(),
                &mut rng,
            )
            .unwrap();
        assert_eq!(decision.injury, cut);

        let none = Triage::default().select_most_urgent_injury(
            &agent,
            &[InjuryId::new()],
            &ReferencePhysiology::default(),
            &mut rng,
        );
        assert_eq!(none, None);
    }

    #[test]
    fn bleeding_tier_prefers_proportional_bleeders() {
        let mut agent = human();
        let arm = agent.body.find("left arm").unwrap();
        let leg = agent.body.find("right leg").unwrap();
        agent.add_injury(Injury::new("gash", arm, 10.0, 0.2));
        let cut = agent.add_injury(Injury::new("cut", leg, 1.0, 0.05));
        let decision = select(&Triage::default(), &agent).unwrap();
        assert_eq!(decision, TriageDecision { injury: cut, tier: Tier::Bleeding });
    }

    #[test]
    fn machines_skip_the_bleeding_tier() {
        let mut agent = Agent::new(
            "Test Mech",
            TissueClass::Mechanical,
            anatomy::humanoid().unwrap(),
        );
        let arm = agent.body.find("left arm").unwrap();
        let brain = agent.body.find("brain").unwrap();
        agent.add_injury(Injury::new("gash", arm, 1.0, 5.0));
        let dent = agent.add_injury(Injury::new("dent", brain, 0.5, 0.0));
        let decision = select(&Triage::default(), &agent).unwrap();
        assert_eq!(decision.injury, dent);
        assert_eq!(decision.tier, Tier::CriticalPart { checkpoint: 0.1 });
    }

    #[test]
    fn walking_is_restored_before_late_checkpoints() {
        let mut agent = human();
        let left = agent.body.find("left leg").unwrap();
        agent.body.set_missing(left, true).unwrap();
        let foot = agent.body.find("right foot").unwrap();
        let crush = agent.add_injury(Injury::new("crush", foot, 24.0, 0.0));
        let decision = select(&Triage::default(), &agent).unwrap();
        assert_eq!(decision.injury, crush);
        assert_eq!(decision.tier, Tier::Functional { capacity: Capacity::Moving });
    }

    #[test]
    fn advisory_results_only_end_selection_when_configured() {
        let mut agent = human();
        let eye = agent.body.find("left eye").unwrap();
        let scratch = agent.add_injury(Injury::new("scratch", eye, 2.0, 0.0));
        let ids = [scratch];
        let physiology = ReferencePhysiology::default();

        let lenient = Triage::default();
        assert_eq!(lenient.evaluate(&agent, &ids, &physiology), None);
        let mut rng = SmallRng::seed_from_u64(3);
        let random = lenient
            .select_most_urgent_injury(&agent, &ids, &physiology, &mut rng)
            .unwrap();
        assert_eq!(random.tier, Tier::Random);

        let strict = Triage::new(TriageConfig {
            advisory_terminal: true,
            ..TriageConfig::default()
        });
        let decision = strict.evaluate(&agent, &ids, &physiology).unwrap();
        assert_eq!(
            decision.tier,
            Tier::Advisory {
                capacity: Capacity::Sight
            }
        );
    }

    #[test]
    fn tier_display_names_the_stage() {
        let tier = Tier::CriticalCapacity {
            checkpoint: 0.2,
            capacity: Capacity::Breathing,
        };
        assert_eq!(tier.to_string(), "critical breathing below 0.2");
    }

    /// Capacity model without tunables of its own.
    struct Opaque(ReferencePhysiology);

    impl CapacityModel for Opaque {
        fn capacity_level(&self, state: &DamageState<'_>, capacity: Capacity) -> f32 {
            self.0.capacity_level(state, capacity)
        }

        fn tag_efficiency(
            &self,
            state: &DamageState<'_>,
            tag: BodyPartTag,
            maximum: f32,
            best_part_weight: Option<f32>,
        ) -> f32 {
            self.0.tag_efficiency(state, tag, maximum, best_part_weight)
        }

        fn limb_efficiency(
            &self,
            state: &DamageState<'_>,
            limb: LimbTags,
            appendage_weight: f32,
        ) -> LimbEfficiency {
            self.0.limb_efficiency(state, limb, appendage_weight)
        }
    }

    impl ImmuneModel for Opaque {
        fn progression(
            &self,
            agent: &Agent,
            condition: &Condition,
        ) -> Option<DailyProgression> {
            self.0.progression(agent, condition)
        }
    }

    #[test]
    fn tag_weights_use_the_physiology_tunables() {
        let own = PhysiologyConfig {
            sense_best_part_weight: 0.9,
            moving_appendage_weight: 0.5,
            ..PhysiologyConfig::default()
        };
        let physiology = ReferencePhysiology::new(own.clone());
        let config = TriageConfig::default();
        assert_eq!(tunables(&config, &physiology), &own);
        assert_eq!(config.reference_physiology().tunables(), Some(&config.physiology));

        let opaque = Opaque(physiology);
        assert_eq!(tunables(&config, &opaque), &config.physiology);
    }
}
