//! Survival forecast for the immune race.

use triage_body::ImmuneModel;
use triage_types::{Agent, Condition};

/// The visible, still-racing condition with the largest
/// `immunity - severity` gap. Ties go to the first.
pub fn most_severe_immunizable(agent: &Agent) -> Option<&Condition> {
    let mut best: Option<(&Condition, f32)> = None;
    for condition in &agent.conditions {
        let Some(immunizable) = condition.immunizable else {
            continue;
        };
        if !condition.visible || condition.fully_immune() || condition.severity <= 0.0 {
            continue;
        }
        let gap = immunizable.immunity - condition.severity;
        if best.is_none_or(|(_, best_gap)| gap > best_gap) {
            best = Some((condition, gap));
        }
    }
    best.map(|(condition, _)| condition)
}

/// Whether the agent's immunity will out-pace its worst immunizable
/// condition.
///
/// Agents without such a condition survive by definition, as do conditions
/// the immune model reports no rates for. Tending lowers daily severity
/// growth by `severity_per_day_tended * quality`. Equal rates do not count
/// as surviving.
pub fn will_survive_disease<P: ImmuneModel + ?Sized>(agent: &Agent, immune: &P) -> bool {
    let Some(condition) = most_severe_immunizable(agent) else {
        return true;
    };
    let Some(rates) = immune.progression(agent, condition) else {
        return true;
    };

    let tend_effect = condition
        .tending
        .map_or(0.0, |tending| tending.severity_per_day_tended * tending.quality);
    let severity_per_day = rates.severity_per_day + tend_effect;
    let survives = rates.immunity_per_day > severity_per_day;

    tracing::debug!(
        agent_id = %agent.id,
        condition = %condition.label,
        immunity_per_day = rates.immunity_per_day,
        severity_per_day,
        survives,
        "Immune race forecast"
    );
    survives
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use triage_body::ReferencePhysiology;
    use triage_types::{BodyBuilder, ConditionKind, Immunizable, Tending, TissueClass};

    use super::*;

    fn agent() -> Agent {
        Agent::new(
            "Test Agent",
            TissueClass::Organic,
            BodyBuilder::new("torso", 40.0, []).build(),
        )
    }

    fn disease(label: &str, severity: f32, immunity: f32, gain: f32, growth: f32) -> Condition {
        let mut condition = Condition::new(label, ConditionKind::Disease, severity);
        condition.immunizable = Some(Immunizable {
            immunity,
            immunity_per_day: gain,
            severity_per_day: growth,
        });
        condition
    }

    #[test]
    fn healthy_agent_survives() {
        assert!(will_survive_disease(&agent(), &ReferencePhysiology::default()));
    }

    #[test]
    fn equal_rates_do_not_survive() {
        let mut a = agent();
        a.conditions.push(disease("plague", 0.3, 0.1, 0.25, 0.25));
        assert!(!will_survive_disease(&a, &ReferencePhysiology::default()));
    }

    #[test]
    fn zero_severity_always_survives() {
        let mut a = agent();
        a.conditions.push(disease("plague", 0.0, 0.0, 0.0, 1.0));
        assert!(will_survive_disease(&a, &ReferencePhysiology::default()));
    }

    #[test]
    fn faster_immunity_survives() {
        let mut a = agent();
        a.conditions.push(disease("flu", 0.3, 0.1, 0.3, 0.2));
        assert!(will_survive_disease(&a, &ReferencePhysiology::default()));

        a.stats.immunity_gain_speed = 0.5;
        assert!(!will_survive_disease(&a, &ReferencePhysiology::default()));
    }

    #[test]
    fn tending_slows_the_disease() {
        let mut a = agent();
        let mut infection = disease("infection", 0.4, 0.1, 0.2, 0.3);
        a.conditions.push(infection.clone());
        assert!(!will_survive_disease(&a, &ReferencePhysiology::default()));

        infection.tending = Some(Tending {
            quality: 0.5,
            severity_per_day_tended: -0.4,
        });
        a.conditions = vec![infection];
        assert!(will_survive_disease(&a, &ReferencePhysiology::default()));
    }

    #[test]
    fn hidden_and_immune_conditions_are_ignored() {
        let mut a = agent();
        let mut hidden = disease("hidden", 0.5, 0.0, 0.0, 1.0);
        hidden.visible = false;
        a.conditions.push(hidden);
        a.conditions.push(disease("beaten", 0.5, 1.0, 0.0, 1.0));
        assert!(most_severe_immunizable(&a).is_none());
        assert!(will_survive_disease(&a, &ReferencePhysiology::default()));
    }

    #[test]
    fn largest_gap_is_selected() {
        let mut a = agent();
        a.conditions.push(disease("flu", 0.6, 0.2, 0.3, 0.1));
        a.conditions.push(disease("plague", 0.2, 0.5, 0.1, 0.4));
        assert_eq!(most_severe_immunizable(&a).unwrap().label, "plague");
    }
}
