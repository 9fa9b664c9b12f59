//! Prompt assembly for enrichment operations
//!
//! Every prompt embeds the relevant slice of the lore index so generated
//! text stays in-world, and states the exact output contract — structured
//! text only, no commentary.

use crate::engine::graph::Entity;
use crate::lore::index::LoreIndex;

/// The shared lore block embedded in every system prompt
pub fn lore_slice(index: &LoreIndex) -> String {
    let mut s = String::new();

    s.push_str("COLONIES:\n");
    for colony in &index.colonies {
        s.push_str(&format!(
            "- {} ({}): {}\n",
            colony.name, colony.theme, colony.description
        ));
    }

    if !index.tensions.is_empty() {
        s.push_str("\nTENSIONS:\n");
        for tension in &index.tensions {
            s.push_str(&format!("- {}\n", tension));
        }
    }

    s.push_str("\nTECH NOTES:\n");
    for note in &index.tech_notes {
        s.push_str(&format!("- {}\n", note));
    }

    s.push_str("\nMAGIC NOTES:\n");
    for note in &index.magic_notes {
        s.push_str(&format!("- {}\n", note));
    }

    s.push_str("\nCANON (do not contradict):\n");
    for fact in &index.canon_facts {
        s.push_str(&format!("- {}\n", fact));
    }

    s
}

/// System + user prompts for a batched entity enrichment call.
///
/// The model must answer with a JSON array of
/// `{"id": <number>, "name": <string|null>, "description": <string>}`.
pub fn entity_batch(index: &LoreIndex, entities: &[&Entity]) -> (String, String) {
    let system = format!(
        "You are the archivist of a procedurally generated colony world.\n\
         Rewrite placeholder entity names and descriptions so they fit the lore below.\n\
         Names keep the world's separator convention. Descriptions are one or two sentences.\n\n\
         {}\n\
         OUTPUT FORMAT (JSON array only, no explanation):\n\
         [{{\"id\": 0, \"name\": \"...\", \"description\": \"...\"}}]\n\
         Use the given ids. Set \"name\" to null to keep a name unchanged.",
        lore_slice(index)
    );

    let mut user = String::from("ENTITIES:\n");
    for entity in entities {
        user.push_str(&format!(
            "- id {}: {} ({}, {}), prominence {}: {}\n",
            entity.id.0, entity.name, entity.kind, entity.subtype, entity.prominence,
            entity.description
        ));
    }
    user.push_str("\nEnrich these entities as JSON:");

    (system, user)
}

/// Prompts for a single relationship backstory
pub fn relationship_backstory(
    index: &LoreIndex,
    src: &Entity,
    dst: &Entity,
    kind: &str,
) -> (String, String) {
    let system = format!(
        "You are the archivist of a procedurally generated colony world.\n\
         Write a short backstory (two sentences at most) for a relationship,\n\
         consistent with the lore below. Answer with the backstory text only.\n\n{}",
        lore_slice(index)
    );

    let user = format!(
        "RELATIONSHIP: {} ({}) --[{}]--> {} ({})\n\nBackstory:",
        src.name, src.kind, kind, dst.name, dst.kind
    );

    (system, user)
}

/// Prompts for ability flavor text
pub fn ability_flavor(index: &LoreIndex, entity: &Entity) -> (String, String) {
    let system = format!(
        "You are the archivist of a procedurally generated colony world.\n\
         Write flavor text (two sentences at most) for an ability, grounding it\n\
         in the tech or magic notes below. Answer with the flavor text only.\n\n{}",
        lore_slice(index)
    );

    let user = format!(
        "ABILITY: {} ({}): {}\n\nFlavor text:",
        entity.name, entity.subtype, entity.description
    );

    (system, user)
}

/// Prompts for an era-transition narrative
pub fn era_narrative(index: &LoreIndex, from: &str, to: &str, epoch: u64) -> (String, String) {
    let system = format!(
        "You are the archivist of a procedurally generated colony world.\n\
         Write a short narrative (three sentences at most) marking the passage\n\
         from one era to the next, consistent with the lore below.\n\
         Answer with the narrative text only.\n\n{}",
        lore_slice(index)
    );

    let user = format!(
        "At epoch {}, the era of {} gives way to the era of {}.\n\nNarrative:",
        epoch, from, to
    );

    (system, user)
}
