//! Pressure accumulation: the graph's shape feeds back into growth

use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::systems::{System, SystemCtx};

/// Accumulates pressures from graph composition each tick. Factions feed
/// ambition, rivalries feed unrest, rules feed order (and dampen unrest),
/// abilities feed mystery, settlement feeds expansion. All adjustments
/// clamp to the pressure range.
pub struct PressureAccumulation;

impl System for PressureAccumulation {
    fn name(&self) -> &'static str {
        "pressure_accumulation"
    }

    fn apply(&self, ctx: &mut SystemCtx) -> Result<()> {
        let factions = ctx.graph.count_by_kind(&EntityKind::Faction) as f64;
        let rules = ctx.graph.count_by_kind(&EntityKind::Rule) as f64;
        let abilities = ctx.graph.count_by_kind(&EntityKind::Ability) as f64;
        let locations = ctx.graph.count_by_kind(&EntityKind::Location) as f64;
        let rivalries = ctx
            .graph
            .active_relationships()
            .filter(|r| r.kind == "rival_of")
            .count() as f64;

        ctx.pressures.adjust("ambition", 0.003 + 0.001 * factions);
        ctx.pressures
            .adjust("unrest", 0.002 * rivalries - 0.001 * rules);
        ctx.pressures
            .adjust("order", 0.002 * rules - 0.001 * rivalries);
        ctx.pressures.adjust("mystery", 0.001 + 0.001 * abilities);
        ctx.pressures
            .adjust("expansion", 0.002 + 0.0005 * locations);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RelationshipBudgetConfig;
    use crate::core::types::SimClock;
    use crate::engine::budget::RelationshipBudget;
    use crate::engine::graph::{ProposedEntity, WorldGraph};
    use crate::engine::pressure::PressureMap;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_factions_raise_ambition() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        graph.insert_entity(
            ProposedEntity::new(EntityKind::Faction, "guild", "Gray-Compact"),
            &clock,
        );

        let mut pressures = PressureMap::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: 1,
            max_per_growth_phase: 1,
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

        PressureAccumulation.apply(&mut ctx).unwrap();
        assert!(pressures.get("ambition") > 0.0);
        assert!(pressures.get("ambition") <= 1.0);
    }
}
