//! Per-tick state transformers
//!
//! Systems run every tick in fixed registration order, before any growth
//! phase. Each may mutate entities, relationships, and pressures through
//! the tick context; relationship creation always goes through the
//! budget-guarded hook, never straight into the graph. A system returning
//! an error aborts the run — that regime is for programming and
//! configuration faults, not expected outcomes.

mod decay;
mod drift;
mod pressure;

pub use decay::RelationshipDecay;
pub use drift::AttributeDrift;
pub use pressure::PressureAccumulation;

use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use crate::core::error::Result;
use crate::core::types::{EntityId, RelationshipId, SimClock};
use crate::engine::budget::RelationshipBudget;
use crate::engine::graph::WorldGraph;
use crate::engine::pressure::PressureMap;

/// Mutable view of one tick, handed to each system in turn
pub struct SystemCtx<'a> {
    pub graph: &'a mut WorldGraph,
    pub pressures: &'a mut PressureMap,
    pub clock: &'a SimClock,
    pub rng: &'a mut ChaCha8Rng,
    pub(crate) budget: &'a mut RelationshipBudget,
    pub(crate) committed: &'a mut Vec<RelationshipId>,
}

impl SystemCtx<'_> {
    /// Propose a relationship through the budget guard.
    ///
    /// Returns the committed edge id, or `None` when the endpoints are
    /// invalid, the edge already exists, or a budget counter is exhausted.
    /// A budget drop is silent: expected growth-pressure behavior.
    pub fn propose_relationship(
        &mut self,
        src: EntityId,
        dst: EntityId,
        kind: impl Into<String>,
        strength: f64,
    ) -> Option<RelationshipId> {
        let kind = kind.into();
        if src == dst || self.graph.entity(src).is_none() || self.graph.entity(dst).is_none() {
            return None;
        }
        if self.graph.has_relationship(src, dst, &kind) {
            return None;
        }
        if !self.budget.try_commit() {
            return None;
        }
        let id = self
            .graph
            .insert_relationship(src, dst, kind, strength, BTreeMap::new(), self.clock);
        self.committed.push(id);
        Some(id)
    }
}

/// One per-tick transformer
pub trait System {
    fn name(&self) -> &'static str;

    fn apply(&self, ctx: &mut SystemCtx) -> Result<()>;
}

/// The stock registry, in the order the world settles each tick:
/// attributes drift, old ties fade, then pressures respond to the shape
/// of the graph.
pub fn standard() -> Vec<Box<dyn System>> {
    vec![
        Box::new(AttributeDrift::default()),
        Box::new(RelationshipDecay::default()),
        Box::new(PressureAccumulation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RelationshipBudgetConfig;
    use crate::core::types::EntityKind;
    use crate::engine::graph::ProposedEntity;
    use rand::SeedableRng;

    #[test]
    fn test_propose_relationship_respects_budget() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        let a = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock);
        let b = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "C-D"), &clock);
        let c = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "E-F"), &clock);

        let mut pressures = PressureMap::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: 1,
            max_per_growth_phase: 10,
        });
        let mut committed = Vec::new();
        let mut ctx = SystemCtx {
            graph: &mut graph,
            pressures: &mut pressures,
            clock: &clock,
            rng: &mut rng,
            budget: &mut budget,
            committed: &mut committed,
        };

        assert!(ctx.propose_relationship(a, b, "rival_of", 1.0).is_some());
        // Tick budget exhausted: silent drop
        assert!(ctx.propose_relationship(a, c, "rival_of", 1.0).is_none());
        assert_eq!(committed.len(), 1);
    }

    #[test]
    fn test_duplicate_edge_not_committed() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        let a = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock);
        let b = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "C-D"), &clock);

        let mut pressures = PressureMap::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: 10,
            max_per_growth_phase: 10,
        });
        let mut committed = Vec::new();
        let mut ctx = SystemCtx {
            graph: &mut graph,
            pressures: &mut pressures,
            clock: &clock,
            rng: &mut rng,
            budget: &mut budget,
            committed: &mut committed,
        };

        assert!(ctx.propose_relationship(a, b, "ally_of", 1.0).is_some());
        assert!(ctx.propose_relationship(a, b, "ally_of", 1.0).is_none());
        // The duplicate consumed no budget
        assert_eq!(ctx.budget.committed_this_tick(), 1);
    }
}
