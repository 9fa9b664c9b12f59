//! Actor growth: named individuals entering the history

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::engine::graph::{EntityRef, ProposedEntity, ProposedRelationship};
use crate::templates::{forge_name, pick_weighted, GrowthCtx, GrowthProposal, GrowthTemplate};

const GIVEN: &[&str] = &[
    "Maren", "Ilya", "Cassen", "Odra", "Tev", "Bram", "Sorel", "Nym", "Halka", "Jorun", "Petra",
    "Vael",
];
const FAMILY: &[&str] = &[
    "Voss", "Kess", "Dray", "Marel", "Stav", "Orin", "Calder", "Ferro", "Lune", "Skarn",
];
const SUBTYPES: &[&str] = &["warden", "envoy", "forgewright", "seer", "quartermaster"];

pub struct ActorTemplate;

impl GrowthTemplate for ActorTemplate {
    fn name(&self) -> &'static str {
        "actor_growth"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Actor
    }

    fn eligible(&self, ctx: &GrowthCtx) -> bool {
        let count = ctx.graph.count_by_kind(&EntityKind::Actor);
        // Below the soft target actors always appear; past it, only while
        // unrest keeps churning people into the record.
        count < ctx.target_per_kind || ctx.pressures.get("unrest") > 0.6
    }

    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal> {
        let mut proposal = GrowthProposal::new();

        let count = if rng.gen_bool(ctx.pressures.get("ambition").clamp(0.0, 1.0)) {
            2
        } else {
            1
        };

        for _ in 0..count {
            let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];
            let name = forge_name(rng, GIVEN, FAMILY);
            let entity = ProposedEntity::new(EntityKind::Actor, subtype, name)
                .describe(format!("A {} of the colony, newly entered in the record", subtype))
                .with_attribute("resolve", rng.gen_range(0.2..0.9))
                .with_attribute("influence", rng.gen_range(0.0..0.4));
            let idx = proposal.add_entity(entity);

            // Most newcomers attach to an existing faction
            if rng.gen_bool(0.6) {
                if let Some(faction) = pick_weighted(rng, ctx, &EntityKind::Faction) {
                    proposal.add_relationship(ProposedRelationship::new(
                        EntityRef::New(idx),
                        EntityRef::Existing(faction),
                        "member_of",
                    ));
                }
            }

            // Unrest breeds rivalries
            if rng.gen_bool(0.25 * ctx.pressures.get("unrest") + 0.05) {
                if let Some(rival) = pick_weighted(rng, ctx, &EntityKind::Actor) {
                    let mut rel = ProposedRelationship::new(
                        EntityRef::New(idx),
                        EntityRef::Existing(rival),
                        "rival_of",
                    );
                    rel.strength = rng.gen_range(0.3..1.0);
                    proposal.add_relationship(rel);
                }
            }
        }

        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::SimClock;
    use crate::engine::graph::WorldGraph;
    use crate::engine::pressure::PressureMap;
    use rand::SeedableRng;

    fn ctx<'a>(
        graph: &'a WorldGraph,
        pressures: &'a PressureMap,
        clock: &'a SimClock,
    ) -> GrowthCtx<'a> {
        GrowthCtx {
            graph,
            pressures,
            clock,
            target_per_kind: 5,
        }
    }

    #[test]
    fn test_eligible_below_target() {
        let graph = WorldGraph::new();
        let pressures = PressureMap::default();
        let clock = SimClock::start("Founding");
        assert!(ActorTemplate.eligible(&ctx(&graph, &pressures, &clock)));
    }

    #[test]
    fn test_ineligible_at_target_without_unrest() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        for i in 0..5 {
            graph.insert_entity(
                ProposedEntity::new(EntityKind::Actor, "warden", format!("A-{}", i)),
                &clock,
            );
        }
        let pressures = PressureMap::default();
        assert!(!ActorTemplate.eligible(&ctx(&graph, &pressures, &clock)));
    }

    #[test]
    fn test_proposes_named_actors() {
        let graph = WorldGraph::new();
        let pressures = PressureMap::default();
        let clock = SimClock::start("Founding");
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let proposal = ActorTemplate
            .propose(&ctx(&graph, &pressures, &clock), &mut rng)
            .unwrap();
        assert!(!proposal.entities.is_empty());
        for entity in &proposal.entities {
            assert_eq!(entity.kind, EntityKind::Actor);
            assert!(entity.name.contains('-'));
            assert!(entity.attributes.contains_key("resolve"));
        }
        // No factions or actors exist, so nothing to link against
        assert!(proposal.relationships.is_empty());
    }
}
