//! Blood-loss recovery scaled by regeneration sources.
//!
//! The host recovers blood loss at a fixed base rate. Agents that heal
//! faster (or slower) than baseline get that rate scaled by:
//!
//! - the product of every condition stage's natural healing factor,
//! - the agent's injury healing factor,
//! - each [`RegenerationProvider`] the host registers.
//!
//! Providers replace probing optional integrations at runtime: the host
//! builds [`NoRegeneration`], [`BuiltInRegeneration`], or
//! [`ComponentRegeneration`] values up front and passes them in.
//!
//! Accelerated recovery is paid for with food when the agent eats; if the
//! food need cannot cover it, no extra recovery happens this interval.

use serde::{Deserialize, Serialize};
use triage_types::Agent;

use crate::config::RegenerationConfig;

/// Where the agent is and what it is doing, as far as healing cares.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RegenerationContext {
    /// Lying down (in bed or downed).
    pub resting: bool,
    /// Extra healing per day granted by the bed, if in one.
    pub bed_heal_per_day: Option<f32>,
    /// Standing in sunlight.
    pub in_sunlight: bool,
    /// Standing in water.
    pub on_water: bool,
}

/// A source of regeneration that scales blood recovery.
pub trait RegenerationProvider {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Multiplier on recovery, 1.0 when the source does nothing.
    fn factor(
        &self,
        agent: &Agent,
        context: &RegenerationContext,
        config: &RegenerationConfig,
    ) -> f32;
}

/// No regeneration at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegeneration;

impl RegenerationProvider for NoRegeneration {
    fn name(&self) -> &'static str {
        "none"
    }

    fn factor(&self, _: &Agent, _: &RegenerationContext, _: &RegenerationConfig) -> f32 {
        1.0
    }
}

/// Regeneration granted by condition stages (e.g. a healing serum).
///
/// Stage regeneration is health per day; it is expressed as a multiple of
/// the baseline healing rate, boosted while resting and by the bed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltInRegeneration;

impl RegenerationProvider for BuiltInRegeneration {
    fn name(&self) -> &'static str {
        "built_in"
    }

    fn factor(
        &self,
        agent: &Agent,
        context: &RegenerationContext,
        config: &RegenerationConfig,
    ) -> f32 {
        let regeneration: f32 = agent
            .conditions
            .iter()
            .filter_map(|condition| condition.stage)
            .map(|stage| stage.regeneration)
            .filter(|regen| *regen > 0.0)
            .sum();

        if regeneration <= 0.0 || config.base_heal_per_day <= 0.0 {
            return 1.0;
        }

        let scale = agent.stats.health_scale.max(f32::EPSILON);
        let mut bonus = regeneration / config.base_heal_per_day / scale;
        if context.resting {
            let heal_per_day = config.base_heal_per_day
                + config.rest_heal_bonus
                + context.bed_heal_per_day.unwrap_or(0.0);
            bonus *= heal_per_day / config.base_heal_per_day;
        }
        1.0 + bonus
    }
}

/// One third-party regeneration component attached to the agent or to one
/// of its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegenerationComponent {
    /// Ticks between heals.
    pub rate_in_ticks: f32,
    /// Health healed each time.
    pub heal_amount: f32,
    /// Only works in sunlight.
    pub needs_sun: bool,
    /// Only works while standing in water.
    pub needs_water: bool,
}

impl RegenerationComponent {
    /// Whether the environment lets this component work right now.
    pub const fn is_available(&self, context: &RegenerationContext) -> bool {
        (!self.needs_sun || context.in_sunlight) && (!self.needs_water || context.on_water)
    }
}

/// Regeneration supplied by third-party components.
#[derive(Debug, Clone, Default)]
pub struct ComponentRegeneration {
    /// Every component the host found on the agent and its conditions.
    pub components: Vec<RegenerationComponent>,
}

impl RegenerationProvider for ComponentRegeneration {
    fn name(&self) -> &'static str {
        "component"
    }

    fn factor(
        &self,
        agent: &Agent,
        context: &RegenerationContext,
        config: &RegenerationConfig,
    ) -> f32 {
        if config.base_heal_per_day <= 0.0 {
            return 1.0;
        }
        let scale = agent.stats.health_scale.max(f32::EPSILON);
        let mut factor = 1.0;
        for component in &self.components {
            if component.rate_in_ticks <= 0.0 || !component.is_available(context) {
                continue;
            }
            let heals_per_day = config.ticks_per_day / component.rate_in_ticks;
            let heal_per_day = heals_per_day * component.heal_amount;
            factor += heal_per_day / config.base_heal_per_day / scale;
        }
        factor
    }
}

/// Product of the natural healing factors of every condition stage.
pub fn natural_healing_factor(agent: &Agent) -> f32 {
    agent
        .conditions
        .iter()
        .filter_map(|condition| condition.stage)
        .filter_map(|stage| stage.natural_healing_factor)
        .product()
}

/// A blood-recovery adjustment for one health interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloodRecovery {
    /// Severity change to apply to the blood-loss condition. Negative heals.
    pub severity_offset: f32,
    /// Food to deduct from the agent's nourishment. Zero when free.
    pub food_cost: f32,
}

/// Compute the blood-loss adjustment for one interval.
///
/// Returns `None` when nothing should change: the agent is still bleeding
/// heavily, has no blood loss, heals at the standard rate, or cannot pay
/// the food cost of faster recovery.
pub fn blood_recovery(
    agent: &Agent,
    context: &RegenerationContext,
    providers: &[&dyn RegenerationProvider],
    config: &RegenerationConfig,
) -> Option<BloodRecovery> {
    if agent.bleed_rate_total() >= config.bleeding_block_threshold {
        return None;
    }

    let blood_loss = agent.blood_loss()?;
    if blood_loss.severity <= 0.0 {
        return None;
    }

    let mut scale = natural_healing_factor(agent) * agent.stats.injury_healing_factor;
    for provider in providers {
        let factor = provider.factor(agent, context, config);
        tracing::trace!(provider = provider.name(), factor, "Regeneration factor");
        scale *= factor;
    }

    if (scale - 1.0).abs() < f32::EPSILON {
        return None;
    }

    let extra = scale.max(config.min_regen_scale) - 1.0;
    let severity_offset = config.base_recovery_rate * extra;

    match agent.needs.food {
        Some(food) if extra > 0.0 => {
            let food_cost = -config.base_recovery_rate
                * config.food_to_blood_multiplier
                * extra
                * agent.stats.metabolism_factor;
            if food < food_cost {
                tracing::debug!(
                    agent_id = %agent.id,
                    food,
                    food_cost,
                    "Not enough food for accelerated blood recovery"
                );
                return None;
            }
            Some(BloodRecovery {
                severity_offset,
                food_cost,
            })
        }
        _ => Some(BloodRecovery {
            severity_offset,
            food_cost: 0.0,
        }),
    }
}
