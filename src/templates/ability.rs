//! Ability growth: rites, crafts, and workings entering circulation

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::engine::graph::{EntityRef, ProposedEntity, ProposedRelationship};
use crate::templates::{forge_name, pick_weighted, GrowthCtx, GrowthProposal, GrowthTemplate};

const ELEMENTS: &[&str] = &["Tide", "Rift", "Ember", "Veil", "Signal", "Glass"];
const ACTS: &[&str] = &["Warding", "Binding", "Calling", "Tempering", "Reading"];
const SUBTYPES: &[&str] = &["rite", "craft", "working"];

pub struct AbilityTemplate;

impl GrowthTemplate for AbilityTemplate {
    fn name(&self) -> &'static str {
        "ability_growth"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Ability
    }

    fn eligible(&self, ctx: &GrowthCtx) -> bool {
        ctx.graph.count_by_kind(&EntityKind::Ability) < ctx.target_per_kind
            && ctx.pressures.get("mystery") >= 0.25
    }

    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal> {
        let mut proposal = GrowthProposal::new();

        let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];
        let name = forge_name(rng, ELEMENTS, ACTS);
        // Placeholder flavor leans magic or tech; enrichment rewrites it
        let flavor = if rng.gen_bool(0.5) {
            "Draws on the rift-tide through warded glass"
        } else {
            "Worked at the forge and carried over the relay"
        };
        let entity = ProposedEntity::new(EntityKind::Ability, subtype, name)
            .describe(flavor)
            .with_attribute("potency", rng.gen_range(0.1..0.8));
        let idx = proposal.add_entity(entity);

        // Someone has to wield it for it to enter the record
        if let Some(actor) = pick_weighted(rng, ctx, &EntityKind::Actor) {
            proposal.add_relationship(ProposedRelationship::new(
                EntityRef::Existing(actor),
                EntityRef::New(idx),
                "wields",
            ));
        }

        Ok(proposal)
    }
}
