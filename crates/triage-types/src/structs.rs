//! Core entity structs: agents, injuries, and conditions.
//!
//! These mirror the host's health model closely enough for triage. The
//! engine never mutates them; every hypothetical is derived from a snapshot.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::enums::{ConditionKind, TissueClass};
use crate::ids::{AgentId, ConditionId, InjuryId, PartIndex};

// ---------------------------------------------------------------------------
// Injuries
// ---------------------------------------------------------------------------

/// A localized damage record on exactly one body part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Injury {
    /// Unique identifier.
    pub id: InjuryId,
    /// Descriptive label ("cut", "gunshot").
    pub label: String,
    /// The part this injury lives on.
    pub part: PartIndex,
    /// Health removed from the part. Non-negative, unbounded.
    pub severity: f32,
    /// Blood lost per day. Zero for closed wounds.
    pub bleed_rate: f32,
}

impl Injury {
    /// Create an injury with a fresh id.
    pub fn new(label: &str, part: PartIndex, severity: f32, bleed_rate: f32) -> Self {
        Self {
            id: InjuryId::new(),
            label: label.to_owned(),
            part,
            severity,
            bleed_rate,
        }
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// Immune-system race state for a condition that can be out-grown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Immunizable {
    /// Current immunity level (0.0 to 1.0). 1.0 means fully immune.
    pub immunity: f32,
    /// Immunity gained per day at an immunity-gain stat of 1.0.
    pub immunity_per_day: f32,
    /// Severity gained per day while not immune and untreated.
    pub severity_per_day: f32,
}

/// Treatment applied to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tending {
    /// Quality of the last treatment (0.0 to 1.0).
    pub quality: f32,
    /// Severity change per day at full quality. Usually negative.
    pub severity_per_day_tended: f32,
}

/// Effects of a condition's current stage on healing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionStage {
    /// Multiplier on natural healing, `None` when the stage has no effect.
    pub natural_healing_factor: Option<f32>,
    /// Health regenerated per day by this stage.
    pub regeneration: f32,
}

/// A non-injury health condition (disease, blood loss, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Unique identifier.
    pub id: ConditionId,
    /// Descriptive label ("flu", "infection").
    pub label: String,
    /// Broad category.
    pub kind: ConditionKind,
    /// Current severity. Lethal conditions kill at 1.0.
    pub severity: f32,
    /// Whether the condition has been noticed. Hidden ones are ignored.
    pub visible: bool,
    /// Immune race state, if the condition can be immunized against.
    pub immunizable: Option<Immunizable>,
    /// Treatment state, if currently tended.
    pub tending: Option<Tending>,
    /// Current stage effects on healing, if any.
    pub stage: Option<ConditionStage>,
}

impl Condition {
    /// Create a visible condition with no immune, treatment, or stage data.
    pub fn new(label: &str, kind: ConditionKind, severity: f32) -> Self {
        Self {
            id: ConditionId::new(),
            label: label.to_owned(),
            kind,
            severity,
            visible: true,
            immunizable: None,
            tending: None,
            stage: None,
        }
    }

    /// Whether the agent has reached full immunity to this condition.
    pub fn fully_immune(&self) -> bool {
        self.immunizable.is_some_and(|imm| imm.immunity >= 1.0)
    }
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// Needs relevant to recovery.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Needs {
    /// Nourishment level (0.0 to 1.0), `None` for agents that do not eat.
    pub food: Option<f32>,
}

/// Stat values the host computes for the agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Multiplier on immunity gained per day.
    pub immunity_gain_speed: f32,
    /// Multiplier on injury healing speed.
    pub injury_healing_factor: f32,
    /// Body-size health scale (1.0 for a baseline humanoid).
    pub health_scale: f32,
    /// Food consumed per unit of metabolic work (1.0 baseline).
    pub metabolism_factor: f32,
}

impl Default for AgentStats {
    fn default() -> Self {
        Self {
            immunity_gain_speed: 1.0,
            injury_healing_factor: 1.0,
            health_scale: 1.0,
            metabolism_factor: 1.0,
        }
    }
}

/// The subject of triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Display name.
    pub label: String,
    /// Tissue class; selects life-critical capacities.
    pub tissue: TissueClass,
    /// Body topology.
    pub body: Body,
    /// Active injuries, tended or not.
    pub injuries: Vec<Injury>,
    /// Active conditions.
    pub conditions: Vec<Condition>,
    /// Current needs.
    pub needs: Needs,
    /// Host-computed stats.
    pub stats: AgentStats,
}

impl Agent {
    /// Create an uninjured, healthy agent.
    pub fn new(label: &str, tissue: TissueClass, body: Body) -> Self {
        Self {
            id: AgentId::new(),
            label: label.to_owned(),
            tissue,
            body,
            injuries: Vec::new(),
            conditions: Vec::new(),
            needs: Needs::default(),
            stats: AgentStats::default(),
        }
    }

    /// Look up an injury by id.
    pub fn injury(&self, id: InjuryId) -> Option<&Injury> {
        self.injuries.iter().find(|injury| injury.id == id)
    }

    /// Add an injury and return its id.
    pub fn add_injury(&mut self, injury: Injury) -> InjuryId {
        let id = injury.id;
        self.injuries.push(injury);
        id
    }

    /// Injuries located on `part`, in insertion order.
    pub fn injuries_on(&self, part: PartIndex) -> impl Iterator<Item = &Injury> {
        self.injuries.iter().filter(move |injury| injury.part == part)
    }

    /// Whether this agent bleeds at all.
    pub const fn can_bleed(&self) -> bool {
        self.tissue.can_bleed()
    }

    /// Sum of the bleed rates of every active injury.
    pub fn bleed_rate_total(&self) -> f32 {
        if !self.can_bleed() {
            return 0.0;
        }
        self.injuries.iter().map(|injury| injury.bleed_rate).sum()
    }

    /// The first blood-loss condition, if any.
    pub fn blood_loss(&self) -> Option<&Condition> {
        self.conditions
            .iter()
            .find(|condition| condition.kind == ConditionKind::BloodLoss)
    }
}
