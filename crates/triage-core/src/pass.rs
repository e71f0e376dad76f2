//! Pass-scoped state and caches.
//!
//! A [`Pass`] is created at the start of one triage decision and dropped at
//! its end. It owns the damage snapshot plus three memo tables, so nothing
//! learned about one agent can leak into a decision about another:
//!
//! - [`TagWeightCache`] -- one [`TagWeightTable`] per capacity
//! - [`ChildPartIndex`] -- descendants carrying a tag, per (part, tag)
//! - [`CapacityValueCache`] -- current level per capacity

use std::collections::BTreeMap;

use triage_body::{CapacityModel, DamageState, PhysiologyConfig};
use triage_types::{Agent, Body, BodyPartTag, Capacity, PartIndex};

use crate::impact::tag_weights;

// ---------------------------------------------------------------------------
// Tag weights
// ---------------------------------------------------------------------------

/// Contribution weight of each body-part tag to one capacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagWeightTable {
    weights: BTreeMap<BodyPartTag, f32>,
}

impl TagWeightTable {
    /// An empty table.
    pub const fn new() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Set the weight of `tag`, replacing any previous value.
    pub fn insert(&mut self, tag: BodyPartTag, weight: f32) {
        self.weights.insert(tag, weight);
    }

    /// Weight of `tag`, zero when the tag does not contribute.
    pub fn weight(&self, tag: BodyPartTag) -> f32 {
        self.weights.get(&tag).copied().unwrap_or(0.0)
    }

    /// Number of contributing tags.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no tag contributes.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Every (tag, weight) pair in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyPartTag, f32)> + '_ {
        self.weights.iter().map(|(tag, weight)| (*tag, *weight))
    }
}

/// Tag-weight tables built so far in this pass.
#[derive(Debug, Clone, Default)]
pub struct TagWeightCache {
    tables: BTreeMap<Capacity, TagWeightTable>,
}

impl TagWeightCache {
    /// The table for `capacity`, building it on first use.
    pub fn get_or_build<P: CapacityModel + ?Sized>(
        &mut self,
        capacity: Capacity,
        state: &DamageState<'_>,
        physiology: &P,
        config: &PhysiologyConfig,
    ) -> &TagWeightTable {
        self.tables
            .entry(capacity)
            .or_insert_with(|| tag_weights(capacity, state, physiology, config))
    }

    /// Number of tables built.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table has been built yet.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Child parts
// ---------------------------------------------------------------------------

/// Memoized "descendants of this part carrying this tag" lookups.
#[derive(Debug, Clone, Default)]
pub struct ChildPartIndex {
    entries: BTreeMap<(PartIndex, BodyPartTag), Vec<PartIndex>>,
}

impl ChildPartIndex {
    /// Descendants of `part` tagged `tag`, walking the tree on first use.
    pub fn descendants_with_tag(
        &mut self,
        body: &Body,
        part: PartIndex,
        tag: BodyPartTag,
    ) -> &[PartIndex] {
        self.entries
            .entry((part, tag))
            .or_insert_with(|| body.descendants_with_tag(part, tag))
    }

    /// Number of memoized lookups.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been looked up yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Capacity values
// ---------------------------------------------------------------------------

/// Current capacity levels computed so far in this pass.
#[derive(Debug, Clone, Default)]
pub struct CapacityValueCache {
    values: BTreeMap<Capacity, f32>,
}

impl CapacityValueCache {
    /// Current level of `capacity`, computing it on first use.
    pub fn level<P: CapacityModel + ?Sized>(
        &mut self,
        capacity: Capacity,
        state: &DamageState<'_>,
        physiology: &P,
    ) -> f32 {
        *self
            .values
            .entry(capacity)
            .or_insert_with(|| physiology.capacity_level(state, capacity))
    }
}

// ---------------------------------------------------------------------------
// Pass
// ---------------------------------------------------------------------------

/// Everything one triage decision reads and memoizes.
///
/// Fields are public so components can borrow caches and the snapshot
/// independently.
#[derive(Debug)]
pub struct Pass<'a, P: ?Sized> {
    /// The agent being triaged.
    pub agent: &'a Agent,
    /// Host capacity and immune model.
    pub physiology: &'a P,
    /// Tunables of the tag-weight factors.
    pub config: &'a PhysiologyConfig,
    /// Damage snapshot of the agent at the start of the pass.
    pub state: DamageState<'a>,
    /// Tag weights per capacity.
    pub tag_weights: TagWeightCache,
    /// Descendants per (part, tag).
    pub children: ChildPartIndex,
    /// Current levels per capacity.
    pub values: CapacityValueCache,
}

impl<'a, P: CapacityModel + ?Sized> Pass<'a, P> {
    /// Start a pass over `agent` with empty caches.
    pub fn new(agent: &'a Agent, physiology: &'a P, config: &'a PhysiologyConfig) -> Self {
        Self {
            agent,
            physiology,
            config,
            state: DamageState::of(agent),
            tag_weights: TagWeightCache::default(),
            children: ChildPartIndex::default(),
            values: CapacityValueCache::default(),
        }
    }

    /// Current level of `capacity` for the agent.
    pub fn level(&mut self, capacity: Capacity) -> f32 {
        self.values.level(capacity, &self.state, self.physiology)
    }
}
