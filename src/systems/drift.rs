//! Attribute drift: the slow churn of everything already in the world

use rand::Rng;

use crate::core::error::Result;
use crate::systems::{System, SystemCtx};

/// Jitters entity attributes each tick and occasionally raises
/// prominence, weighted by ambient ambition.
pub struct AttributeDrift {
    /// Maximum per-tick attribute movement
    pub rate: f64,
}

impl Default for AttributeDrift {
    fn default() -> Self {
        Self { rate: 0.02 }
    }
}

impl System for AttributeDrift {
    fn name(&self) -> &'static str {
        "attribute_drift"
    }

    fn apply(&self, ctx: &mut SystemCtx) -> Result<()> {
        let step_chance = 0.005 + 0.03 * ctx.pressures.get("ambition");
        let rate = self.rate;

        let rng = &mut *ctx.rng;
        ctx.graph.for_each_entity_mut(|entity| {
            for value in entity.attributes.values_mut() {
                let delta = rng.gen_range(-rate..=rate);
                *value = (*value + delta).clamp(0.0, 1.0);
            }
            if rng.gen_bool(step_chance) {
                entity.prominence = entity.prominence.step_up();
            }
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RelationshipBudgetConfig;
    use crate::core::types::{EntityKind, Prominence, SimClock};
    use crate::engine::budget::RelationshipBudget;
    use crate::engine::graph::{ProposedEntity, WorldGraph};
    use crate::engine::pressure::PressureMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_attributes_stay_in_range() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        graph.insert_entity(
            ProposedEntity::new(EntityKind::Actor, "warden", "Maren-Voss")
                .with_attribute("resolve", 0.99)
                .with_attribute("influence", 0.01),
            &clock,
        );

        let mut pressures = PressureMap::default();
        pressures.set("ambition", 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: 1,
            max_per_growth_phase: 1,
        });
        let mut committed = Vec::new();

        let system = AttributeDrift::default();
        for _ in 0..200 {
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

        let entity = graph.entities().next().unwrap();
        for value in entity.attributes.values() {
            assert!((0.0..=1.0).contains(value));
        }
        // With max ambition over 200 ticks, prominence moved at least once
        assert!(entity.prominence > Prominence::Unnoticed);
    }
}
