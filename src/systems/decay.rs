//! Relationship decay: ties weaken and eventually lapse

use crate::core::error::Result;
use crate::systems::{System, SystemCtx};

/// Reduces every active edge's strength per tick. At zero the edge
/// deactivates; it is never removed, so the history stays whole.
pub struct RelationshipDecay {
    pub rate: f64,
}

impl Default for RelationshipDecay {
    fn default() -> Self {
        Self { rate: 0.004 }
    }
}

impl System for RelationshipDecay {
    fn name(&self) -> &'static str {
        "relationship_decay"
    }

    fn apply(&self, ctx: &mut SystemCtx) -> Result<()> {
        for relationship in ctx.graph.relationships_mut() {
            if !relationship.active {
                continue;
            }
            relationship.strength -= self.rate;
            if relationship.strength <= 0.0 {
                relationship.strength = 0.0;
                relationship.active = false;
                tracing::debug!(
                    rel = relationship.id.0,
                    kind = %relationship.kind,
                    "relationship lapsed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RelationshipBudgetConfig;
    use crate::core::types::{EntityKind, SimClock};
    use crate::engine::budget::RelationshipBudget;
    use crate::engine::graph::{ProposedEntity, WorldGraph};
    use crate::engine::pressure::PressureMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::BTreeMap;

    #[test]
    fn test_edges_lapse_but_remain() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        let a = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "A-B"), &clock);
        let b = graph.insert_entity(ProposedEntity::new(EntityKind::Actor, "x", "C-D"), &clock);
        graph.insert_relationship(a, b, "rival_of".into(), 0.01, BTreeMap::new(), &clock);

        let mut pressures = PressureMap::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: 1,
            max_per_growth_phase: 1,
        });
        let mut committed = Vec::new();

        let system = RelationshipDecay::default();
        for _ in 0..5 {
            let mut ctx = SystemCtx {
                graph: &mut graph,
                pressures: &mut pressures,
                clock: &clock,
                rng: &mut rng,
                budget: &mut budget,
                committed: &mut committed,
            };
            system.apply(&mut ctx).unwrap();
        }

        assert_eq!(graph.relationships().len(), 1);
        let rel = &graph.relationships()[0];
        assert!(!rel.active);
        assert_eq!(rel.strength, 0.0);
    }
}
