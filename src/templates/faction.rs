//! Faction growth: compacts, guilds, and cabals coalescing from actors

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::{EntityKind, Prominence};
use crate::engine::graph::{EntityRef, ProposedEntity, ProposedRelationship};
use crate::templates::{forge_name, pick_weighted, GrowthCtx, GrowthProposal, GrowthTemplate};

const EPITHETS: &[&str] = &[
    "Sworn", "Gray", "First", "Deep", "Iron", "Quiet", "Broken", "Last",
];
const BODIES: &[&str] = &[
    "Compact", "Circle", "Cabal", "Wardens", "Syndicate", "Choir", "League",
];
const SUBTYPES: &[&str] = &["guild", "compact", "cabal", "order"];

pub struct FactionTemplate;

impl GrowthTemplate for FactionTemplate {
    fn name(&self) -> &'static str {
        "faction_growth"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Faction
    }

    fn eligible(&self, ctx: &GrowthCtx) -> bool {
        // Factions need people to form from and ambition to form for
        ctx.graph.count_by_kind(&EntityKind::Faction) < ctx.target_per_kind
            && ctx.graph.count_by_kind(&EntityKind::Actor) >= 2
            && ctx.pressures.get("ambition") >= 0.25
    }

    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal> {
        let mut proposal = GrowthProposal::new();

        let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];
        let name = forge_name(rng, EPITHETS, BODIES);
        let mut entity = ProposedEntity::new(EntityKind::Faction, subtype, name)
            .describe(format!(
                "A {} formed in the colony amid rising ambition",
                subtype
            ))
            .with_attribute("cohesion", rng.gen_range(0.4..0.9))
            .with_attribute("reach", rng.gen_range(0.1..0.5));
        entity.prominence = Prominence::Local;
        let idx = proposal.add_entity(entity);

        // Founding members drawn from existing actors
        let founders = rng.gen_range(1..=2);
        for _ in 0..founders {
            if let Some(actor) = pick_weighted(rng, ctx, &EntityKind::Actor) {
                let mut rel = ProposedRelationship::new(
                    EntityRef::Existing(actor),
                    EntityRef::New(idx),
                    "member_of",
                );
                rel.metadata.insert("role".into(), "founder".into());
                proposal.add_relationship(rel);
            }
        }

        // A new power sometimes sets itself against an old one
        if rng.gen_bool(0.3) {
            if let Some(other) = pick_weighted(rng, ctx, &EntityKind::Faction) {
                let mut rel = ProposedRelationship::new(
                    EntityRef::New(idx),
                    EntityRef::Existing(other),
                    "rival_of",
                );
                rel.strength = rng.gen_range(0.4..1.0);
                proposal.add_relationship(rel);
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

    #[test]
    fn test_needs_actors_and_ambition() {
        let graph = WorldGraph::new();
        let mut pressures = PressureMap::default();
        pressures.set("ambition", 0.8);
        let clock = SimClock::start("Founding");
        let ctx = GrowthCtx {
            graph: &graph,
            pressures: &pressures,
            clock: &clock,
            target_per_kind: 5,
        };
        // No actors yet
        assert!(!FactionTemplate.eligible(&ctx));
    }

    #[test]
    fn test_proposes_faction_with_founders() {
        let mut graph = WorldGraph::new();
        let clock = SimClock::start("Founding");
        for name in ["Maren-Voss", "Ilya-Kess", "Tev-Dray"] {
            graph.insert_entity(
                ProposedEntity::new(EntityKind::Actor, "warden", name),
                &clock,
            );
        }
        let mut pressures = PressureMap::default();
        pressures.set("ambition", 0.5);
        let ctx = GrowthCtx {
            graph: &graph,
            pressures: &pressures,
            clock: &clock,
            target_per_kind: 5,
        };
        assert!(FactionTemplate.eligible(&ctx));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let proposal = FactionTemplate.propose(&ctx, &mut rng).unwrap();
        assert_eq!(proposal.entities.len(), 1);
        assert_eq!(proposal.entities[0].kind, EntityKind::Faction);
        assert!(proposal
            .relationships
            .iter()
            .any(|r| r.kind == "member_of"));
    }
}
