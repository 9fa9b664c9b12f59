//! Growth templates - kind-specific entity/relationship generators
//!
//! A template is a predicate ("eligible given the current graph and
//! pressures?") plus a factory emitting proposed entities and
//! relationships. Templates are stateless, registered once, and fire in
//! registration order on growth ticks — every eligible template fires,
//! there is no single-winner selection. Templates read a snapshot and
//! never mutate it; randomness comes from the engine's seeded generator.

mod ability;
mod actor;
mod faction;
mod location;
mod rule;

pub use ability::AbilityTemplate;
pub use actor::ActorTemplate;
pub use faction::FactionTemplate;
pub use location::LocationTemplate;
pub use rule::RuleTemplate;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::{EntityKind, SimClock};
use crate::engine::graph::{ProposedEntity, ProposedRelationship, WorldGraph};
use crate::engine::pressure::PressureMap;

/// Read-only view handed to templates on growth ticks
pub struct GrowthCtx<'a> {
    pub graph: &'a WorldGraph,
    pub pressures: &'a PressureMap,
    pub clock: &'a SimClock,
    /// Soft per-kind population target; advisory, gates eligibility only
    pub target_per_kind: usize,
}

/// What a template wants added to the world this phase
#[derive(Debug, Default)]
pub struct GrowthProposal {
    pub entities: Vec<ProposedEntity>,
    pub relationships: Vec<ProposedRelationship>,
}

impl GrowthProposal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty() && self.relationships.is_empty()
    }

    /// Add an entity, returning its index for `EntityRef::New` links
    pub fn add_entity(&mut self, entity: ProposedEntity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn add_relationship(&mut self, relationship: ProposedRelationship) {
        self.relationships.push(relationship);
    }
}

/// One growth rule: eligibility predicate plus proposal factory
pub trait GrowthTemplate {
    fn name(&self) -> &'static str;

    /// The entity kind this template grows
    fn kind(&self) -> EntityKind;

    fn eligible(&self, ctx: &GrowthCtx) -> bool;

    /// Propose zero or more entities/relationships. An error here is a
    /// programming or configuration fault and aborts the run.
    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal>;
}

/// The stock registry: one template per built-in kind, in the order the
/// world grows most naturally (people, then the structures around them).
pub fn standard() -> Vec<Box<dyn GrowthTemplate>> {
    vec![
        Box::new(ActorTemplate),
        Box::new(FactionTemplate),
        Box::new(LocationTemplate),
        Box::new(RuleTemplate),
        Box::new(AbilityTemplate),
    ]
}

/// Compose a two-part name from word lists, joined by the world's
/// dominant separator.
pub(crate) fn forge_name(rng: &mut ChaCha8Rng, first: &[&str], second: &[&str]) -> String {
    let a = first[rng.gen_range(0..first.len())];
    let b = second[rng.gen_range(0..second.len())];
    format!("{}-{}", a, b)
}

/// Pick an existing entity id of a kind, weighted toward higher prominence.
pub(crate) fn pick_weighted(
    rng: &mut ChaCha8Rng,
    ctx: &GrowthCtx,
    kind: &EntityKind,
) -> Option<crate::core::types::EntityId> {
    let candidates: Vec<_> = ctx
        .graph
        .entities()
        .filter(|e| &e.kind == kind)
        .map(|e| (e.id, 1 + e.prominence as u32))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let total: u32 = candidates.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (id, weight) in candidates {
        if roll < weight {
            return Some(id);
        }
        roll -= weight;
    }
    None
}
