//! Immutable snapshot of body damage.
//!
//! A [`DamageState`] records how much severity sits on each part of one
//! body. Part health is always derived (`max - damage`, clamped to
//! `[0, max]`), so a counterfactual "what if this injury were healed" is a
//! new value built with [`DamageState::excluding`] rather than an edit to
//! the agent.

use triage_types::{Agent, Body, Injury, InjuryId, PartIndex};

/// Per-part accumulated damage for one body.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageState<'a> {
    body: &'a Body,
    damage: Vec<f32>,
    excluded: Vec<InjuryId>,
}

impl<'a> DamageState<'a> {
    /// Snapshot every active injury of `agent`.
    pub fn of(agent: &'a Agent) -> Self {
        Self::from_injuries(&agent.body, &agent.injuries)
    }

    /// Snapshot an explicit injury list against `body`.
    ///
    /// Injuries pointing at parts outside the body are ignored.
    pub fn from_injuries(body: &'a Body, injuries: &[Injury]) -> Self {
        let mut damage = vec![0.0; body.len()];
        for injury in injuries {
            if let Some(slot) = damage.get_mut(injury.part.get()) {
                *slot += injury.severity.max(0.0);
            }
        }
        Self {
            body,
            damage,
            excluded: Vec::new(),
        }
    }

    /// Derive the state in which `injury` never happened.
    pub fn excluding(&self, injury: &Injury) -> Self {
        let mut next = self.clone();
        if next.excluded.contains(&injury.id) {
            return next;
        }
        if let Some(slot) = next.damage.get_mut(injury.part.get()) {
            *slot = (*slot - injury.severity.max(0.0)).max(0.0);
        }
        next.excluded.push(injury.id);
        next
    }

    /// The body this state describes.
    pub const fn body(&self) -> &'a Body {
        self.body
    }

    /// Injuries removed from this state by [`excluding`](Self::excluding).
    pub fn excluded(&self) -> &[InjuryId] {
        &self.excluded
    }

    /// Maximum health of a part, zero for unknown parts.
    pub fn max_health(&self, part: PartIndex) -> f32 {
        self.body.part(part).map_or(0.0, |p| p.max_health)
    }

    /// Current health of a part, in `[0, max]`.
    pub fn part_health(&self, part: PartIndex) -> f32 {
        let max = self.max_health(part);
        if max <= 0.0 {
            return 0.0;
        }
        let damage = self.damage.get(part.get()).copied().unwrap_or(0.0);
        (max - damage).clamp(0.0, max)
    }

    /// `health / max`, or `None` for parts with no positive max health.
    pub fn health_fraction(&self, part: PartIndex) -> Option<f32> {
        let max = self.max_health(part);
        if max <= 0.0 {
            return None;
        }
        Some(self.part_health(part) / max)
    }

    /// `1 - health / max`, or `None` for parts with no positive max health.
    pub fn damage_fraction(&self, part: PartIndex) -> Option<f32> {
        self.health_fraction(part).map(|fraction| 1.0 - fraction)
    }

    /// Whether the part itself is gone: flagged missing or at zero health.
    pub fn is_missing(&self, part: PartIndex) -> bool {
        self.body.part(part).is_none_or(|p| p.missing) || self.part_health(part) <= 0.0
    }

    /// Whether the part and every ancestor are present.
    pub fn is_functional(&self, part: PartIndex) -> bool {
        !self.is_missing(part)
            && self
                .body
                .ancestors(part)
                .into_iter()
                .all(|ancestor| !self.is_missing(ancestor))
    }

    /// Efficiency of a single part: `health / max`, zero when not functional.
    pub fn part_efficiency(&self, part: PartIndex) -> f32 {
        if !self.is_functional(part) {
            return 0.0;
        }
        self.health_fraction(part).unwrap_or(0.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use triage_types::{BodyBuilder, TissueClass};

    use super::*;

    fn agent() -> (Agent, PartIndex, PartIndex) {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        let arm = b.add_part(b.root(), "arm", 30.0, []).unwrap();
        let hand = b.add_part(arm, "hand", 20.0, []).unwrap();
        (Agent::new("Test Agent", TissueClass::Organic, b.build()), arm, hand)
    }

    #[test]
    fn health_is_derived_from_injuries() {
        let (mut a, arm, _) = agent();
        a.add_injury(Injury::new("cut", arm, 10.0, 0.0));
        a.add_injury(Injury::new("cut", arm, 5.0, 0.0));
        let state = DamageState::of(&a);
        assert!((state.part_health(arm) - 15.0).abs() < 1e-6);
        assert!((state.damage_fraction(arm).unwrap() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn excluding_restores_only_that_injury() {
        let (mut a, arm, _) = agent();
        let big = Injury::new("crush", arm, 25.0, 0.0);
        a.add_injury(big.clone());
        a.add_injury(Injury::new("cut", arm, 10.0, 0.0));
        let state = DamageState::of(&a);
        assert!(state.part_health(arm).abs() < 1e-6);

        let healed = state.excluding(&big);
        assert!((healed.part_health(arm) - 20.0).abs() < 1e-6);
        // The source snapshot is untouched.
        assert!(state.part_health(arm).abs() < 1e-6);
        assert_eq!(healed.excluded(), &[big.id]);
    }

    #[test]
    fn destroyed_parent_disables_children() {
        let (mut a, arm, hand) = agent();
        a.add_injury(Injury::new("shot", arm, 30.0, 0.0));
        let state = DamageState::of(&a);
        assert!(state.is_missing(arm));
        assert!(!state.is_missing(hand));
        assert!(!state.is_functional(hand));
        assert!(state.part_efficiency(hand).abs() < f32::EPSILON);
    }

    #[test]
    fn flagged_missing_part_has_no_efficiency() {
        let (mut a, _, hand) = agent();
        a.body.set_missing(hand, true).unwrap();
        let state = DamageState::of(&a);
        assert!(state.is_missing(hand));
        assert!(state.part_efficiency(hand).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_max_health_has_no_fraction() {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        let odd = b.add_part(b.root(), "malformed", 0.0, []).unwrap();
        let a = Agent::new("Test Agent", TissueClass::Organic, b.build());
        let state = DamageState::of(&a);
        assert_eq!(state.damage_fraction(odd), None);
        assert!(state.part_health(odd).abs() < f32::EPSILON);
    }
}
