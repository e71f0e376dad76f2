//! Counterfactual injury scoring.
//!
//! The worst offender against a capacity is the injury whose absence would
//! raise that capacity the most. Each candidate is scored on a damage state
//! derived with the injury excluded; the agent itself is never touched.

use triage_body::{CapacityModel, DamageState};
use triage_types::{Capacity, Injury};

use crate::pass::CapacityValueCache;

/// The candidate whose healing would raise `capacity` the most.
///
/// Ties go to the first candidate. Returns `None` when no candidate would
/// raise the level at all.
pub fn most_impactful_injury<'i, P: CapacityModel + ?Sized>(
    state: &DamageState<'_>,
    injuries: &[&'i Injury],
    capacity: Capacity,
    values: &mut CapacityValueCache,
    physiology: &P,
) -> Option<&'i Injury> {
    let current = values.level(capacity, state, physiology);
    let mut best_gain = 0.0_f32;
    let mut best = None;

    for &injury in injuries {
        let healed = state.excluding(injury);
        let gain = physiology.capacity_level(&healed, capacity) - current;
        tracing::trace!(%capacity, injury = %injury.label, part = %injury.part, gain, "Counterfactual gain");
        if gain > best_gain {
            best_gain = gain;
            best = Some(injury);
        }
    }

    best
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use triage_body::{ReferencePhysiology, anatomy};
    use triage_types::{Agent, TissueClass};

    use super::*;

    fn human() -> Agent {
        Agent::new("Test Agent", TissueClass::Organic, anatomy::humanoid().unwrap())
    }

    #[test]
    fn picks_the_injury_whose_removal_helps_most() {
        let mut agent = human();
        let heart = agent.body.find("heart").unwrap();
        let arm = agent.body.find("left arm").unwrap();
        agent.add_injury(Injury::new("scratch", heart, 2.0, 0.0));
        let stab = agent.add_injury(Injury::new("stab", heart, 8.0, 0.0));
        agent.add_injury(Injury::new("cut", arm, 12.0, 0.0));

        let physiology = ReferencePhysiology::default();
        let state = DamageState::of(&agent);
        let candidates: Vec<&Injury> = agent.injuries.iter().collect();
        let mut values = CapacityValueCache::default();
        let pick = most_impactful_injury(
            &state,
            &candidates,
            Capacity::BloodPumping,
            &mut values,
            &physiology,
        );
        assert_eq!(pick.map(|injury| injury.id), Some(stab));
    }

    #[test]
    fn removal_strictly_improves_and_beats_the_rest() {
        let mut agent = human();
        for (label, part, severity) in [
            ("bruise", "left lung", 4.0),
            ("puncture", "right lung", 9.0),
            ("crack", "ribcage", 10.0),
            ("cut", "neck", 3.0),
        ] {
            let part = agent.body.find(part).unwrap();
            agent.add_injury(Injury::new(label, part, severity, 0.0));
        }

        let physiology = ReferencePhysiology::default();
        let state = DamageState::of(&agent);
        let candidates: Vec<&Injury> = agent.injuries.iter().collect();
        let mut values = CapacityValueCache::default();
        let before = values.level(Capacity::Breathing, &state, &physiology);
        let pick = most_impactful_injury(
            &state,
            &candidates,
            Capacity::Breathing,
            &mut values,
            &physiology,
        )
        .unwrap();

        let best = physiology.capacity_level(&state.excluding(pick), Capacity::Breathing);
        assert!(best > before);
        for other in &candidates {
            let level = physiology.capacity_level(&state.excluding(other), Capacity::Breathing);
            assert!(level <= best + 1e-6, "{} beats the pick", other.label);
        }
        // The agent is unchanged.
        assert_eq!(agent.injuries.len(), 4);
    }

    #[test]
    fn no_improvement_means_no_offender() {
        let mut agent = human();
        let arm = agent.body.find("left arm").unwrap();
        agent.add_injury(Injury::new("cut", arm, 5.0, 0.0));
        let physiology = ReferencePhysiology::default();
        let state = DamageState::of(&agent);
        let candidates: Vec<&Injury> = agent.injuries.iter().collect();
        let mut values = CapacityValueCache::default();
        assert!(
            most_impactful_injury(
                &state,
                &candidates,
                Capacity::BloodPumping,
                &mut values,
                &physiology
            )
            .is_none()
        );
    }

    #[test]
    fn equal_gains_go_to_the_first_candidate() {
        let mut agent = human();
        let left = agent.body.find("left kidney").unwrap();
        let right = agent.body.find("right kidney").unwrap();
        let first = agent.add_injury(Injury::new("cut", left, 5.0, 0.0));
        agent.add_injury(Injury::new("cut", right, 5.0, 0.0));
        let physiology = ReferencePhysiology::default();
        let state = DamageState::of(&agent);
        let candidates: Vec<&Injury> = agent.injuries.iter().collect();
        let mut values = CapacityValueCache::default();
        let pick = most_impactful_injury(
            &state,
            &candidates,
            Capacity::BloodFiltration,
            &mut values,
            &physiology,
        );
        assert_eq!(pick.map(|injury| injury.id), Some(first));
    }
}
