//! Enumeration types for the triage engine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tissue class
// ---------------------------------------------------------------------------

/// The kind of tissue an agent is made of.
///
/// Selects which capacities are life-critical and whether the agent bleeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TissueClass {
    /// Flesh-and-blood agents.
    Organic,
    /// Machines and constructs.
    Mechanical,
}

impl TissueClass {
    /// Whether agents of this class lose blood from open wounds.
    pub const fn can_bleed(self) -> bool {
        matches!(self, Self::Organic)
    }
}

// ---------------------------------------------------------------------------
// Capacities
// ---------------------------------------------------------------------------

/// A physiological function whose level derives from body damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Capacity {
    /// Awareness; scales most other capacities.
    Consciousness,
    /// Vision.
    Sight,
    /// Audition.
    Hearing,
    /// Locomotion.
    Moving,
    /// Handling objects.
    Manipulation,
    /// Speech.
    Talking,
    /// Food intake.
    Eating,
    /// Respiration.
    Breathing,
    /// Removing toxins and pathogens from the blood.
    BloodFiltration,
    /// Circulation.
    BloodPumping,
    /// Digestion and energy conversion.
    Metabolism,
}

impl Capacity {
    /// Every capacity, in definition order.
    ///
    /// Iteration over capacities always follows this order so that tie
    /// breaks between equally affected capacities are stable.
    pub const ALL: [Self; 11] = [
        Self::Consciousness,
        Self::Sight,
        Self::Hearing,
        Self::Moving,
        Self::Manipulation,
        Self::Talking,
        Self::Eating,
        Self::Breathing,
        Self::BloodFiltration,
        Self::BloodPumping,
        Self::Metabolism,
    ];

    /// Whether losing this capacity entirely kills an agent of `tissue`.
    pub const fn is_life_critical(self, tissue: TissueClass) -> bool {
        match tissue {
            TissueClass::Organic => matches!(
                self,
                Self::Consciousness | Self::Breathing | Self::BloodFiltration | Self::BloodPumping
            ),
            TissueClass::Mechanical => matches!(self, Self::Consciousness),
        }
    }

    /// The life-critical capacities for `tissue`, in definition order.
    pub fn life_critical(tissue: TissueClass) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|capacity| capacity.is_life_critical(tissue))
            .collect()
    }
}

impl core::fmt::Display for Capacity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Consciousness => "consciousness",
            Self::Sight => "sight",
            Self::Hearing => "hearing",
            Self::Moving => "moving",
            Self::Manipulation => "manipulation",
            Self::Talking => "talking",
            Self::Eating => "eating",
            Self::Breathing => "breathing",
            Self::BloodFiltration => "blood_filtration",
            Self::BloodPumping => "blood_pumping",
            Self::Metabolism => "metabolism",
        };
        write!(f, "{name}")
    }
}

// ---------------------------------------------------------------------------
// Body part tags
// ---------------------------------------------------------------------------

/// A classification label on a body part.
///
/// Tags tie anatomy to capacities: the brain carries
/// [`ConsciousnessSource`](Self::ConsciousnessSource), a lung carries
/// [`BreathingSource`](Self::BreathingSource), and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyPartTag {
    /// Brain or equivalent processor.
    ConsciousnessSource,
    /// Lungs.
    BreathingSource,
    /// Airway (neck).
    BreathingPathway,
    /// Structure enclosing the lungs (ribcage).
    BreathingSourceCage,
    /// Heart or pump.
    BloodPumpingSource,
    /// Kidneys.
    BloodFiltrationKidney,
    /// Liver.
    BloodFiltrationLiver,
    /// Generic filtration organ, for bodies without kidney/liver.
    BloodFiltrationSource,
    /// Stomach or reactor.
    MetabolismSource,
    /// Ears.
    HearingSource,
    /// Eyes.
    SightSource,
    /// Jaw or voice source.
    TalkingSource,
    /// Throat path for speech.
    TalkingPathway,
    /// Tongue; shared between talking and eating.
    Tongue,
    /// Jaw for chewing.
    EatingSource,
    /// Throat path for food.
    EatingPathway,
    /// Shoulder or equivalent root of a manipulation limb.
    ManipulationLimbCore,
    /// Arm and hand segments.
    ManipulationLimbSegment,
    /// Fingers.
    ManipulationLimbDigit,
    /// Leg or equivalent root of a moving limb.
    MovingLimbCore,
    /// Foot segments.
    MovingLimbSegment,
    /// Toes.
    MovingLimbDigit,
    /// Pelvis.
    Pelvis,
    /// Spine.
    Spine,
}

// ---------------------------------------------------------------------------
// Condition kinds
// ---------------------------------------------------------------------------

/// Broad category of a non-injury condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    /// An infection or illness fought by the immune system.
    Disease,
    /// Accumulated loss of blood from bleeding wounds.
    BloodLoss,
    /// Anything else (drugs, implants, chronic effects).
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organic_life_critical_capacities() {
        let critical = Capacity::life_critical(TissueClass::Organic);
        assert_eq!(
            critical,
            vec![
                Capacity::Consciousness,
                Capacity::Breathing,
                Capacity::BloodFiltration,
                Capacity::BloodPumping,
            ]
        );
    }

    #[test]
    fn mechanical_only_needs_consciousness() {
        let critical = Capacity::life_critical(TissueClass::Mechanical);
        assert_eq!(critical, vec![Capacity::Consciousness]);
        assert!(!TissueClass::Mechanical.can_bleed());
        assert!(TissueClass::Organic.can_bleed());
    }

    #[test]
    fn capacity_display() {
        assert_eq!(Capacity::BloodFiltration.to_string(), "blood_filtration");
        assert_eq!(Capacity::Sight.to_string(), "sight");
    }
}
