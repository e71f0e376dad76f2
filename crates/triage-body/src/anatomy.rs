//! Reference anatomies.
//!
//! Hosts normally supply their own topology; these trees exist so the
//! engine can be exercised on realistic bodies. Part labels are unique
//! within a body, so [`Body::find`] can address any part.

use triage_types::{Body, BodyBuilder, BodyPartTag, PartIndex, TopologyError};

const SIDES: [&str; 2] = ["left", "right"];
const FINGERS: [&str; 5] = ["thumb", "index finger", "middle finger", "ring finger", "pinky"];
const TOES: [&str; 5] = ["big toe", "second toe", "middle toe", "fourth toe", "little toe"];

/// Internal organs shared by humanoids and quadrupeds.
fn add_organs(b: &mut BodyBuilder, torso: PartIndex) -> Result<(), TopologyError> {
    b.add_part(torso, "spine", 25.0, [BodyPartTag::Spine])?;
    b.add_part(torso, "stomach", 20.0, [BodyPartTag::MetabolismSource])?;
    b.add_part(torso, "heart", 15.0, [BodyPartTag::BloodPumpingSource])?;
    for side in SIDES {
        b.add_part(torso, &format!("{side} lung"), 15.0, [BodyPartTag::BreathingSource])?;
    }
    for side in SIDES {
        b.add_part(
            torso,
            &format!("{side} kidney"),
            15.0,
            [BodyPartTag::BloodFiltrationKidney],
        )?;
    }
    b.add_part(torso, "liver", 20.0, [BodyPartTag::BloodFiltrationLiver])?;
    Ok(())
}

/// Neck, head, and sense organs. Returns the jaw.
fn add_head(b: &mut BodyBuilder, torso: PartIndex) -> Result<PartIndex, TopologyError> {
    let neck = b.add_part(
        torso,
        "neck",
        25.0,
        [
            BodyPartTag::BreathingPathway,
            BodyPartTag::EatingPathway,
            BodyPartTag::TalkingPathway,
        ],
    )?;
    let head = b.add_part(neck, "head", 25.0, [])?;
    let skull = b.add_part(head, "skull", 25.0, [])?;
    b.add_part(skull, "brain", 10.0, [BodyPartTag::ConsciousnessSource])?;
    for side in SIDES {
        b.add_part(head, &format!("{side} eye"), 10.0, [BodyPartTag::SightSource])?;
    }
    for side in SIDES {
        b.add_part(head, &format!("{side} ear"), 12.0, [BodyPartTag::HearingSource])?;
    }
    b.add_part(head, "nose", 10.0, [])?;
    b.add_part(
        head,
        "jaw",
        20.0,
        [BodyPartTag::EatingSource, BodyPartTag::TalkingSource],
    )
}

/// A two-armed, two-legged body.
pub fn humanoid() -> Result<Body, TopologyError> {
    let mut b = BodyBuilder::new("torso", 40.0, []);
    let torso = b.root();

    add_organs(&mut b, torso)?;
    b.add_part(torso, "ribcage", 30.0, [BodyPartTag::BreathingSourceCage])?;
    b.add_part(torso, "pelvis", 25.0, [BodyPartTag::Pelvis])?;

    let jaw = add_head(&mut b, torso)?;
    b.add_part(jaw, "tongue", 10.0, [BodyPartTag::Tongue])?;

    for side in SIDES {
        let shoulder = b.add_part(
            torso,
            &format!("{side} shoulder"),
            30.0,
            [BodyPartTag::ManipulationLimbCore],
        )?;
        let arm = b.add_part(
            shoulder,
            &format!("{side} arm"),
            30.0,
            [BodyPartTag::ManipulationLimbSegment],
        )?;
        let hand = b.add_part(
            arm,
            &format!("{side} hand"),
            20.0,
            [BodyPartTag::ManipulationLimbSegment],
        )?;
        for finger in FINGERS {
            b.add_part(
                hand,
                &format!("{side} {finger}"),
                8.0,
                [BodyPartTag::ManipulationLimbDigit],
            )?;
        }
    }

    for side in SIDES {
        let leg = b.add_part(torso, &format!("{side} leg"), 30.0, [BodyPartTag::MovingLimbCore])?;
        let foot = b.add_part(
            leg,
            &format!("{side} foot"),
            25.0,
            [BodyPartTag::MovingLimbSegment],
        )?;
        for toe in TOES {
            b.add_part(
                foot,
                &format!("{side} {toe}"),
                8.0,
                [BodyPartTag::MovingLimbDigit],
            )?;
        }
    }

    Ok(b.build())
}

/// A four-legged animal body without hands or speech.
pub fn quadruped() -> Result<Body, TopologyError> {
    let mut b = BodyBuilder::new("body", 40.0, []);
    let torso = b.root();

    add_organs(&mut b, torso)?;
    add_head(&mut b, torso)?;

    for end in ["front", "rear"] {
        for side in SIDES {
            let leg = b.add_part(
                torso,
                &format!("{end} {side} leg"),
                25.0,
                [BodyPartTag::MovingLimbCore],
            )?;
            b.add_part(
                leg,
                &format!("{end} {side} paw"),
                15.0,
                [BodyPartTag::MovingLimbSegment],
            )?;
        }
    }

    Ok(b.build())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn humanoid_labels_are_unique() {
        let body = humanoid().unwrap();
        let labels: BTreeSet<&str> = body.parts().map(|(_, p)| p.label.as_str()).collect();
        assert_eq!(labels.len(), body.len());
    }

    #[test]
    fn humanoid_brain_sits_under_the_neck() {
        let body = humanoid().unwrap();
        let neck = body.find("neck").unwrap();
        let brain = body.find("brain").unwrap();
        assert!(body.descendants(neck).contains(&brain));
        assert_eq!(
            body.descendants_with_tag(neck, BodyPartTag::ConsciousnessSource),
            vec![brain]
        );
    }

    #[test]
    fn humanoid_has_ten_fingers_and_two_legs() {
        let body = humanoid().unwrap();
        assert_eq!(body.parts_with_tag(BodyPartTag::ManipulationLimbDigit).len(), 10);
        assert_eq!(body.parts_with_tag(BodyPartTag::MovingLimbCore).len(), 2);
    }

    #[test]
    fn quadruped_has_four_legs_and_no_hands() {
        let body = quadruped().unwrap();
        assert_eq!(body.parts_with_tag(BodyPartTag::MovingLimbCore).len(), 4);
        assert!(!body.has_part_with_tag(BodyPartTag::ManipulationLimbCore));
        assert!(body.find("tongue").is_none());
    }
}
