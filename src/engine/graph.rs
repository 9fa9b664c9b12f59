//! WorldGraph - entity and relationship store
//!
//! The engine is the sole owner; everything else sees the graph behind a
//! shared or scoped mutable borrow. Entities and relationships are never
//! removed once committed — decay deactivates edges instead, so the full
//! history stays reconstructable from the final graph.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{EntityId, EntityKind, Prominence, RelationshipId, SimClock};

/// A world entity: actor, faction, rule, ability, location, or anything
/// a custom template registers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub subtype: String,
    pub name: String,
    pub description: String,
    pub prominence: Prominence,
    pub created_tick: u64,
    pub created_epoch: u64,
    /// Kind-specific numeric attributes, drifted by systems
    pub attributes: BTreeMap<String, f64>,
    /// Set once model-sourced text has overwritten the placeholders
    pub enriched: bool,
}

/// A directed edge between two entities
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub src: EntityId,
    pub dst: EntityId,
    pub kind: String,
    /// Decays per tick; the edge deactivates at zero
    pub strength: f64,
    pub active: bool,
    pub backstory: Option<String>,
    pub created_tick: u64,
    pub metadata: BTreeMap<String, String>,
}

/// An entity proposed by a growth template, before the graph assigns
/// identity and creation time.
#[derive(Clone, Debug)]
pub struct ProposedEntity {
    pub kind: EntityKind,
    pub subtype: String,
    pub name: String,
    pub description: String,
    pub prominence: Prominence,
    pub attributes: BTreeMap<String, f64>,
}

impl ProposedEntity {
    pub fn new(kind: EntityKind, subtype: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind,
            subtype: subtype.into(),
            name: name.into(),
            description: String::new(),
            prominence: Prominence::Unnoticed,
            attributes: BTreeMap::new(),
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: f64) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }
}

/// Endpoint of a proposed relationship: an existing entity, or an entity
/// from the same proposal batch by index.
#[derive(Clone, Copy, Debug)]
pub enum EntityRef {
    Existing(EntityId),
    /// Index into the proposal's entity list
    New(usize),
}

/// A relationship proposed by a template; commits only if the budget
/// guard has capacity.
#[derive(Clone, Debug)]
pub struct ProposedRelationship {
    pub src: EntityRef,
    pub dst: EntityRef,
    pub kind: String,
    pub strength: f64,
    pub metadata: BTreeMap<String, String>,
}

impl ProposedRelationship {
    pub fn new(src: EntityRef, dst: EntityRef, kind: impl Into<String>) -> Self {
        Self {
            src,
            dst,
            kind: kind.into(),
            strength: 1.0,
            metadata: BTreeMap::new(),
        }
    }
}

/// The entity graph, owned by the engine
#[derive(Default)]
pub struct WorldGraph {
    entities: AHashMap<EntityId, Entity>,
    /// Insertion order, for deterministic iteration and export
    order: Vec<EntityId>,
    relationships: Vec<Relationship>,
    next_entity_id: u32,
    next_relationship_id: u32,
}

impl WorldGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a proposed entity, assigning identity and creation time
    pub fn insert_entity(&mut self, proposed: ProposedEntity, clock: &SimClock) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;

        self.entities.insert(
            id,
            Entity {
                id,
                kind: proposed.kind,
                subtype: proposed.subtype,
                name: proposed.name,
                description: proposed.description,
                prominence: proposed.prominence,
                created_tick: clock.tick,
                created_epoch: clock.epoch,
                attributes: proposed.attributes,
                enriched: false,
            },
        );
        self.order.push(id);
        id
    }

    /// Commit a relationship with already-resolved endpoints. The caller
    /// is responsible for budget enforcement.
    pub fn insert_relationship(
        &mut self,
        src: EntityId,
        dst: EntityId,
        kind: String,
        strength: f64,
        metadata: BTreeMap<String, String>,
        clock: &SimClock,
    ) -> RelationshipId {
        let id = RelationshipId(self.next_relationship_id);
        self.next_relationship_id += 1;

        self.relationships.push(Relationship {
            id,
            src,
            dst,
            kind,
            strength,
            active: true,
            backstory: None,
            created_tick: clock.tick,
            metadata,
        });
        id
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.entities.get(id))
    }

    /// Mutable pass over every entity, in insertion order
    pub fn for_each_entity_mut(&mut self, mut f: impl FnMut(&mut Entity)) {
        for id in &self.order {
            if let Some(entity) = self.entities.get_mut(id) {
                f(entity);
            }
        }
    }

    pub fn entity_count(&self) -> usize {
        self.order.len()
    }

    pub fn count_by_kind(&self, kind: &EntityKind) -> usize {
        self.entities().filter(|e| &e.kind == kind).count()
    }

    /// Entity ids of one kind, in insertion order
    pub fn ids_of_kind(&self, kind: &EntityKind) -> Vec<EntityId> {
        self.entities()
            .filter(|e| &e.kind == kind)
            .map(|e| e.id)
            .collect()
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }

    pub fn relationship_mut(&mut self, id: RelationshipId) -> Option<&mut Relationship> {
        self.relationships.iter_mut().find(|r| r.id == id)
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn relationships_mut(&mut self) -> &mut [Relationship] {
        &mut self.relationships
    }

    pub fn active_relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter().filter(|r| r.active)
    }

    /// An active edge with these endpoints and kind already exists
    pub fn has_relationship(&self, src: EntityId, dst: EntityId, kind: &str) -> bool {
        self.active_relationships()
            .any(|r| r.src == src && r.dst == dst && r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> SimClock {
        SimClock::start("Founding")
    }

    #[test]
    fn test_sequential_entity_ids() {
        let mut graph = WorldGraph::new();
        let a = graph.insert_entity(
            ProposedEntity::new(EntityKind::Actor, "warden", "Maren-Voss"),
            &clock(),
        );
        let b = graph.insert_entity(
            ProposedEntity::new(EntityKind::Actor, "warden", "Ilya-Kess"),
            &clock(),
        );
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(graph.entity_count(), 2);
    }

    #[test]
    fn test_insertion_order_iteration() {
        let mut graph = WorldGraph::new();
        for name in ["First-One", "Second-One", "Third-One"] {
            graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", name), &clock());
        }
        let names: Vec<_> = graph.entities().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["First-One", "Second-One", "Third-One"]);
    }

    #[test]
    fn test_count_by_kind() {
        let mut graph = WorldGraph::new();
        graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock());
        graph.insert_entity(
            ProposedEntity::new(EntityKind::Faction, "x", "C-D"),
            &clock(),
        );
        graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "E-F"), &clock());
        assert_eq!(graph.count_by_kind(&EntityKind::Actor), 2);
        assert_eq!(graph.count_by_kind(&EntityKind::Faction), 1);
        assert_eq!(graph.count_by_kind(&EntityKind::Location), 0);
    }

    #[test]
    fn test_relationship_lookup_and_dedup() {
        let mut graph = WorldGraph::new();
        let a = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock());
        let b = graph.insert_entity(
            ProposedEntity::new(EntityKind::Faction, "x", "C-D"),
            &clock(),
        );
        let rel = graph.insert_relationship(
            a,
            b,
            "member_of".into(),
            1.0,
            BTreeMap::new(),
            &clock(),
        );
        assert!(graph.relationship(rel).is_some());
        assert!(graph.has_relationship(a, b, "member_of"));
        assert!(!graph.has_relationship(b, a, "member_of"));
    }

    #[test]
    fn test_deactivated_edges_are_kept() {
        let mut graph = WorldGraph::new();
        let a = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock());
        let b = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "C-D"), &clock());
        let rel = graph.insert_relationship(a, b, "rival_of".into(), 0.2, BTreeMap::new(), &clock());

        graph.relationship_mut(rel).unwrap().active = false;
        assert_eq!(graph.relationships().len(), 1);
        assert_eq!(graph.active_relationships().count(), 0);
        assert!(!graph.has_relationship(a, b, "rival_of"));
    }
}
