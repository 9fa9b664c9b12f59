//! Rule growth: edicts, customs, and charters binding factions

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::engine::graph::{EntityRef, ProposedEntity, ProposedRelationship};
use crate::templates::{forge_name, pick_weighted, GrowthCtx, GrowthProposal, GrowthTemplate};

const SCOPES: &[&str] = &[
    "Tithe", "Relay", "Forge", "Water", "Border", "Oath", "Salvage",
];
const FORMS: &[&str] = &["Edict", "Charter", "Custom", "Accord", "Ban"];
const SUBTYPES: &[&str] = &["edict", "custom", "charter"];

pub struct RuleTemplate;

impl GrowthTemplate for RuleTemplate {
    fn name(&self) -> &'static str {
        "rule_growth"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Rule
    }

    fn eligible(&self, ctx: &GrowthCtx) -> bool {
        // Rules are written when order is sought and there is someone to bind
        ctx.graph.count_by_kind(&EntityKind::Rule) < ctx.target_per_kind
            && ctx.graph.count_by_kind(&EntityKind::Faction) >= 1
            && ctx.pressures.get("order") >= 0.35
    }

    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal> {
        let mut proposal = GrowthProposal::new();

        let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];
        let name = forge_name(rng, SCOPES, FORMS);
        let entity = ProposedEntity::new(EntityKind::Rule, subtype, name)
            .describe(format!(
                "A {} of the concord, entered into the colony record",
                subtype
            ))
            .with_attribute("severity", rng.gen_range(0.2..0.9));
        let idx = proposal.add_entity(entity);

        if let Some(faction) = pick_weighted(rng, ctx, &EntityKind::Faction) {
            proposal.add_relationship(ProposedRelationship::new(
                EntityRef::New(idx),
                EntityRef::Existing(faction),
                "binds",
            ));
        }

        Ok(proposal)
    }
}
