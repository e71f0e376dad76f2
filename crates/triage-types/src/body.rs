//! Body topology: a rooted tree of tagged parts stored in an arena.
//!
//! The host owns the topology; the triage engine only walks it. Parts are
//! addressed by [`PartIndex`], with the root at index 0 and children kept in
//! insertion order so every traversal is deterministic.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::enums::BodyPartTag;
use crate::error::TopologyError;
use crate::ids::PartIndex;

/// A single node in the body tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyPart {
    /// Human-readable label ("heart", "left lung").
    pub label: String,
    /// Classification tags used by capacity calculations.
    pub tags: BTreeSet<BodyPartTag>,
    /// Health of the part when undamaged. Zero marks a malformed part.
    pub max_health: f32,
    /// Whether the part has been destroyed or removed.
    pub missing: bool,
    /// Parent part, `None` only for the root.
    pub parent: Option<PartIndex>,
    /// Child parts in insertion order.
    pub children: Vec<PartIndex>,
}

impl BodyPart {
    /// Whether this part carries `tag`.
    pub fn has_tag(&self, tag: BodyPartTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// A complete body: an arena of [`BodyPart`]s rooted at [`PartIndex::ROOT`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    parts: Vec<BodyPart>,
}

impl Body {
    /// The root part index.
    pub const fn root(&self) -> PartIndex {
        PartIndex::ROOT
    }

    /// Number of parts in the body.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the body has no parts. Built bodies always have a root.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Look up a part by index.
    pub fn part(&self, index: PartIndex) -> Option<&BodyPart> {
        self.parts.get(index.get())
    }

    /// Iterate over all parts with their indices, in arena order.
    pub fn parts(&self) -> impl Iterator<Item = (PartIndex, &BodyPart)> {
        self.parts
            .iter()
            .enumerate()
            .map(|(i, part)| (PartIndex(i), part))
    }

    /// Find the first part with the given label.
    pub fn find(&self, label: &str) -> Option<PartIndex> {
        self.parts()
            .find(|(_, part)| part.label == label)
            .map(|(index, _)| index)
    }

    /// Direct children of `index`. Unknown indices have no children.
    pub fn children(&self, index: PartIndex) -> &[PartIndex] {
        self.part(index)
            .map(|part| part.children.as_slice())
            .unwrap_or_default()
    }

    /// All descendants of `index` in depth-first pre-order.
    pub fn descendants(&self, index: PartIndex) -> Vec<PartIndex> {
        let mut out = Vec::new();
        self.collect_descendants(index, None, &mut out);
        out
    }

    /// Descendants of `index` that carry `tag`, in depth-first pre-order.
    ///
    /// Untagged intermediate parts are walked through, so a tagged finger
    /// under an untagged hand is still found from the shoulder.
    pub fn descendants_with_tag(&self, index: PartIndex, tag: BodyPartTag) -> Vec<PartIndex> {
        let mut out = Vec::new();
        self.collect_descendants(index, Some(tag), &mut out);
        out
    }

    fn collect_descendants(
        &self,
        index: PartIndex,
        tag: Option<BodyPartTag>,
        out: &mut Vec<PartIndex>,
    ) {
        let mut seen = vec![false; self.parts.len()];
        if let Some(start) = seen.get_mut(index.0) {
            *start = true;
        }
        let mut stack: Vec<PartIndex> = self.children(index).iter().rev().copied().collect();
        while let Some(child) = stack.pop() {
            // Guard against hand-edited (deserialized) bodies with cycles.
            match seen.get_mut(child.0) {
                Some(visited) if !*visited => *visited = true,
                _ => continue,
            }
            let matches = match tag {
                Some(tag) => self.part(child).is_some_and(|part| part.has_tag(tag)),
                None => true,
            };
            if matches {
                out.push(child);
            }
            stack.extend(self.children(child).iter().rev().copied());
        }
    }

    /// Ancestors of `index`, nearest first, ending at the root.
    pub fn ancestors(&self, index: PartIndex) -> Vec<PartIndex> {
        let mut out = Vec::new();
        let mut current = self.part(index).and_then(|part| part.parent);
        while let Some(parent) = current {
            // Guard against hand-edited (deserialized) bodies with cycles.
            if out.contains(&parent) || out.len() > self.parts.len() {
                break;
            }
            out.push(parent);
            current = self.part(parent).and_then(|part| part.parent);
        }
        out
    }

    /// All parts carrying `tag`, in arena order.
    pub fn parts_with_tag(&self, tag: BodyPartTag) -> Vec<PartIndex> {
        self.parts()
            .filter(|(_, part)| part.has_tag(tag))
            .map(|(index, _)| index)
            .collect()
    }

    /// Whether any part carries `tag`.
    pub fn has_part_with_tag(&self, tag: BodyPartTag) -> bool {
        self.parts.iter().any(|part| part.has_tag(tag))
    }

    /// Mark a part as missing (amputated or destroyed).
    pub fn set_missing(&mut self, index: PartIndex, missing: bool) -> Result<(), TopologyError> {
        let part = self
            .parts
            .get_mut(index.get())
            .ok_or(TopologyError::PartNotFound(index))?;
        part.missing = missing;
        Ok(())
    }
}

/// Incremental constructor for a [`Body`].
///
/// ```
/// use triage_types::{BodyBuilder, BodyPartTag};
///
/// let mut builder = BodyBuilder::new("torso", 40.0, []);
/// let heart = builder
///     .add_part(builder.root(), "heart", 15.0, [BodyPartTag::BloodPumpingSource])
///     .ok();
/// assert!(heart.is_some());
/// let body = builder.build();
/// assert_eq!(body.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BodyBuilder {
    parts: Vec<BodyPart>,
}

impl BodyBuilder {
    /// Start a body with its root part.
    ///
    /// The root's max health is taken as given; a malformed root is
    /// tolerated and later skipped by the triage engine.
    pub fn new(
        label: &str,
        max_health: f32,
        tags: impl IntoIterator<Item = BodyPartTag>,
    ) -> Self {
        Self {
            parts: vec![BodyPart {
                label: label.to_owned(),
                tags: tags.into_iter().collect(),
                max_health,
                missing: false,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root index of the body under construction.
    pub const fn root(&self) -> PartIndex {
        PartIndex::ROOT
    }

    /// Attach a new part under `parent` and return its index.
    ///
    /// A max health of exactly zero is accepted (the engine treats such
    /// parts as contributing nothing); negative or non-finite values are
    /// rejected.
    pub fn add_part(
        &mut self,
        parent: PartIndex,
        label: &str,
        max_health: f32,
        tags: impl IntoIterator<Item = BodyPartTag>,
    ) -> Result<PartIndex, TopologyError> {
        if !max_health.is_finite() || max_health < 0.0 {
            return Err(TopologyError::InvalidMaxHealth {
                label: label.to_owned(),
                max_health,
            });
        }

        let index = PartIndex(self.parts.len());
        let parent_part =
            self.parts
                .get_mut(parent.get())
                .ok_or_else(|| TopologyError::UnknownParent {
                    parent,
                    label: label.to_owned(),
                })?;
        parent_part.children.push(index);

        self.parts.push(BodyPart {
            label: label.to_owned(),
            tags: tags.into_iter().collect(),
            max_health,
            missing: false,
            parent: Some(parent),
            children: Vec::new(),
        });
        Ok(index)
    }

    /// Finish construction.
    pub fn build(self) -> Body {
        Body { parts: self.parts }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn arm() -> (Body, PartIndex, PartIndex, PartIndex) {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        let shoulder = b
            .add_part(b.root(), "shoulder", 30.0, [BodyPartTag::ManipulationLimbCore])
            .unwrap();
        let hand = b.add_part(shoulder, "hand", 20.0, []).unwrap();
        let finger = b
            .add_part(hand, "finger", 8.0, [BodyPartTag::ManipulationLimbDigit])
            .unwrap();
        (b.build(), shoulder, hand, finger)
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        let a = b.add_part(b.root(), "a", 1.0, []).unwrap();
        let c = b.add_part(b.root(), "c", 1.0, []).unwrap();
        let body = b.build();
        assert_eq!(body.children(body.root()), &[a, c]);
    }

    #[test]
    fn tagged_descendants_walk_through_untagged_parts() {
        let (body, shoulder, _, finger) = arm();
        assert_eq!(
            body.descendants_with_tag(shoulder, BodyPartTag::ManipulationLimbDigit),
            vec![finger]
        );
        assert!(
            body.descendants_with_tag(finger, BodyPartTag::ManipulationLimbDigit)
                .is_empty()
        );
    }

    #[test]
    fn descendants_are_preorder() {
        let (body, shoulder, hand, finger) = arm();
        assert_eq!(body.descendants(body.root()), vec![shoulder, hand, finger]);
    }

    #[test]
    fn ancestors_nearest_first() {
        let (body, shoulder, hand, finger) = arm();
        assert_eq!(body.ancestors(finger), vec![hand, shoulder, PartIndex::ROOT]);
        assert!(body.ancestors(body.root()).is_empty());
    }

    #[test]
    fn unknown_parent_is_rejected() {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        let err = b.add_part(PartIndex(9), "ghost", 1.0, []);
        assert!(matches!(err, Err(TopologyError::UnknownParent { .. })));
    }

    #[test]
    fn invalid_health_is_rejected_but_zero_is_allowed() {
        let mut b = BodyBuilder::new("torso", 40.0, []);
        assert!(b.add_part(b.root(), "bad", -1.0, []).is_err());
        assert!(b.add_part(b.root(), "nan", f32::NAN, []).is_err());
        assert!(b.add_part(b.root(), "malformed", 0.0, []).is_ok());
    }

    #[test]
    fn tag_queries() {
        let (mut body, shoulder, _, _) = arm();
        assert!(body.has_part_with_tag(BodyPartTag::ManipulationLimbCore));
        assert!(!body.has_part_with_tag(BodyPartTag::BloodFiltrationKidney));
        assert_eq!(
            body.parts_with_tag(BodyPartTag::ManipulationLimbCore),
            vec![shoulder]
        );
        assert!(body.set_missing(shoulder, true).is_ok());
        assert!(body.part(shoulder).unwrap().missing);
        assert!(body.set_missing(PartIndex(99), true).is_err());
        assert_eq!(body.find("hand"), Some(PartIndex(2)));
    }

    #[test]
    fn cyclic_children_are_walked_once() {
        let json = r#"{"parts": [
            {"label": "torso", "tags": [], "max_health": 40.0, "missing": false,
             "parent": null, "children": [1]},
            {"label": "loop", "tags": [], "max_health": 10.0, "missing": false,
             "parent": 0, "children": [0, 1]}
        ]}"#;
        let body: Body = serde_json::from_str(json).unwrap();
        assert_eq!(body.descendants(PartIndex::ROOT), vec![PartIndex(1)]);
        assert_eq!(body.descendants(PartIndex(1)), vec![PartIndex::ROOT]);
    }
}
