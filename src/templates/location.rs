//! Location growth: holdfasts, relays, and shaft-towns on the map

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::error::Result;
use crate::core::types::EntityKind;
use crate::engine::graph::{EntityRef, ProposedEntity, ProposedRelationship};
use crate::templates::{forge_name, pick_weighted, GrowthCtx, GrowthProposal, GrowthTemplate};

const FEATURES: &[&str] = &["High", "Low", "Far", "Black", "Green", "Still"];
const PLACES: &[&str] = &[
    "Reach", "Hollow", "Terrace", "Shaft", "Crossing", "Landing", "Span",
];
const SUBTYPES: &[&str] = &["holdfast", "relay", "shaft-town", "waystation"];

pub struct LocationTemplate;

impl GrowthTemplate for LocationTemplate {
    fn name(&self) -> &'static str {
        "location_growth"
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Location
    }

    fn eligible(&self, ctx: &GrowthCtx) -> bool {
        ctx.graph.count_by_kind(&EntityKind::Location) < ctx.target_per_kind
            && ctx.pressures.get("expansion") >= 0.25
    }

    fn propose(&self, ctx: &GrowthCtx, rng: &mut ChaCha8Rng) -> Result<GrowthProposal> {
        let mut proposal = GrowthProposal::new();

        let subtype = SUBTYPES[rng.gen_range(0..SUBTYPES.len())];
        let name = forge_name(rng, FEATURES, PLACES);
        let entity = ProposedEntity::new(EntityKind::Location, subtype, name)
            .describe(format!("A {} raised on the colony's verge", subtype))
            .with_attribute("capacity", rng.gen_range(0.2..1.0))
            .with_attribute("remoteness", rng.gen_range(0.0..1.0));
        let idx = proposal.add_entity(entity);

        // New ground is usually claimed by whoever pushed for it
        if rng.gen_bool(0.7) {
            if let Some(faction) = pick_weighted(rng, ctx, &EntityKind::Faction) {
                proposal.add_relationship(ProposedRelationship::new(
                    EntityRef::Existing(faction),
                    EntityRef::New(idx),
                    "controls",
                ));
            }
        }
        if rng.gen_bool(0.4) {
            if let Some(actor) = pick_weighted(rng, ctx, &EntityKind::Actor) {
                proposal.add_relationship(ProposedRelationship::new(
                    EntityRef::Existing(actor),
                    EntityRef::New(idx),
                    "resides_in",
                ));
            }
        }

        Ok(proposal)
    }
}
