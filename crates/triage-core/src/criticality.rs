//! Body-part criticality: which injured part is closest to killing the agent.
//!
//! A part's weight is its summed contribution to every life-critical
//! capacity: its own tags at full weight, plus every descendant carrying a
//! contributing tag, scaled by how intact that descendant still is. Missing
//! descendants, and those below a missing part, contribute nothing. The
//! neck of an agent with a healthy brain is worth more than the neck of one
//! whose brain is already gone.

use triage_body::CapacityModel;
use triage_types::{Capacity, Injury, PartIndex};

use crate::pass::Pass;

/// Slack on the damage checkpoint comparison. `1 - health / max` rounds
/// above the checkpoint for parts damaged exactly to it.
const CHECKPOINT_TOLERANCE: f32 = 1e-6;

/// Criticality weight of `part` for one capacity.
pub fn part_capacity_weight<P: CapacityModel + ?Sized>(
    pass: &mut Pass<'_, P>,
    capacity: Capacity,
    part: PartIndex,
) -> f32 {
    let table = pass
        .tag_weights
        .get_or_build(capacity, &pass.state, pass.physiology, pass.config);
    if table.is_empty() {
        return 0.0;
    }

    let body = pass.state.body();
    let Some(record) = body.part(part) else {
        return 0.0;
    };

    let mut total = 0.0_f32;
    for (tag, weight) in table.iter() {
        if record.has_tag(tag) {
            total += weight;
        }
        for &child in pass.children.descendants_with_tag(body, part, tag) {
            total += weight * pass.state.part_efficiency(child);
        }
    }
    total
}

/// The worst injury on the most critical part within `threshold`.
///
/// Only parts whose damage fraction is at most `threshold` are considered;
/// more damaged parts are left to a later, more permissive checkpoint.
/// Parts are visited in the order candidates first touch them, and the
/// first part with the highest strictly positive weight wins. Returns the
/// most severe candidate on that part.
pub fn closest_to_death_injury<'i, P: CapacityModel + ?Sized>(
    pass: &mut Pass<'_, P>,
    injuries: &[&'i Injury],
    threshold: f32,
) -> Option<&'i Injury> {
    let mut parts: Vec<PartIndex> = Vec::new();
    for injury in injuries {
        if !parts.contains(&injury.part) {
            parts.push(injury.part);
        }
    }

    let vital = Capacity::life_critical(pass.agent.tissue);
    let mut best_weight = 0.0_f32;
    let mut best_part = None;

    for part in parts {
        let Some(damage) = pass.state.damage_fraction(part) else {
            tracing::warn!(agent_id = %pass.agent.id, %part, "Skipping part without positive max health");
            continue;
        };
        if damage > threshold + CHECKPOINT_TOLERANCE || pass.state.is_missing(part) {
            continue;
        }

        let weight: f32 = vital
            .iter()
            .map(|&capacity| part_capacity_weight(pass, capacity, part))
            .sum();
        tracing::trace!(%part, damage, weight, threshold, "Part criticality");

        if weight > best_weight {
            best_weight = weight;
            best_part = Some(part);
        }
    }

    let part = best_part?;
    let mut worst: Option<&'i Injury> = None;
    for &injury in injuries.iter().filter(|injury| injury.part == part) {
        if worst.is_none_or(|current| injury.severity > current.severity) {
            worst = Some(injury);
        }
    }
    worst
}
