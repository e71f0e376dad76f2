//! Configuration constants and defaults for body mechanics.
//!
//! [`PhysiologyConfig`] bundles the tunables of the capacity formulas and
//! [`RegenerationConfig`] those of blood recovery, so that hosts and tests
//! can override the defaults without touching the formulas. Both
//! deserialize with per-field defaults, so a partial YAML section works.

use serde::{Deserialize, Serialize};

/// Tunables for capacity and limb-chain calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysiologyConfig {
    /// Weight of finger efficiency within a manipulation limb (default: 0.8).
    pub manipulation_appendage_weight: f32,

    /// Weight of toe efficiency within a moving limb (default: 0.4).
    pub moving_appendage_weight: f32,

    /// Minimum fraction of functional limbs in a set (default: 0.4999).
    ///
    /// Below this, the limb set counts as useless: an agent cannot walk on
    /// one remaining leg out of two, or one out of four.
    pub limb_function_cutoff: f32,

    /// Share of a paired sense organ's level taken from its best part
    /// (default: 0.75). Losing one eye costs far less than half of sight.
    pub sense_best_part_weight: f32,

    /// How much the tongue matters for eating (default: 0.5).
    pub eating_tongue_weight: f32,

    /// How much breathing and blood pumping scale moving (default: 0.2).
    pub moving_vital_weight: f32,
}

impl Default for PhysiologyConfig {
    fn default() -> Self {
        Self {
            manipulation_appendage_weight: 0.8,
            moving_appendage_weight: 0.4,
            limb_function_cutoff: 0.4999,
            sense_best_part_weight: 0.75,
            eating_tongue_weight: 0.5,
            moving_vital_weight: 0.2,
        }
    }
}

/// Tunables for blood-loss recovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationConfig {
    /// Blood-loss severity change per health interval at the standard
    /// healing factor (default: -0.000_333_333_33). Negative heals.
    pub base_recovery_rate: f32,

    /// Floor applied to the combined regeneration scale (default: -0.99).
    pub min_regen_scale: f32,

    /// Health healed per day by a baseline agent (default: 8).
    pub base_heal_per_day: f32,

    /// Extra health healed per day while lying down (default: 4).
    pub rest_heal_bonus: f32,

    /// Food spent per unit of accelerated blood recovery (default: 4).
    pub food_to_blood_multiplier: f32,

    /// Simulation ticks per in-game day (default: 60000).
    pub ticks_per_day: f32,

    /// Total bleed rate at or above which blood does not recover (default: 0.1).
    pub bleeding_block_threshold: f32,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            base_recovery_rate: -0.000_333_333_33,
            min_regen_scale: -0.99,
            base_heal_per_day: 8.0,
            rest_heal_bonus: 4.0,
            food_to_blood_multiplier: 4.0,
            ticks_per_day: 60_000.0,
            bleeding_block_threshold: 0.1,
        }
    }
}
