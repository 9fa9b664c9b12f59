//! Heuristic lore linting for generated text
//!
//! Cheap, warning-only checks against the lore index. Validation never
//! mutates or rejects anything; warnings ride along on the lore record for
//! the enrichment audit trail.

use std::sync::Arc;

use crate::lore::index::LoreIndex;

pub struct LoreValidator {
    index: Arc<LoreIndex>,
}

impl LoreValidator {
    pub fn new(index: Arc<LoreIndex>) -> Self {
        Self { index }
    }

    /// Lint an entity's name and description.
    ///
    /// Names should contain one of the world's naming separators;
    /// descriptions should contain at least one lore-cue term.
    pub fn validate_entity(&self, name: &str, description: &str) -> Vec<String> {
        let mut warnings = Vec::new();

        if !self
            .index
            .naming
            .separators
            .iter()
            .any(|sep| name.contains(sep.as_str()))
        {
            warnings.push(format!(
                "name '{}' has no naming separator ({})",
                name,
                self.index.naming.separators.join(", ")
            ));
        }

        if !description.is_empty() && !contains_any(description, &self.index.cues.lore) {
            warnings.push(format!(
                "description of '{}' references no known lore cue",
                name
            ));
        }

        warnings
    }

    /// Lint ability flavor text: it should reference a magic or tech cue.
    pub fn validate_ability(&self, name: &str, text: &str) -> Vec<String> {
        let mut warnings = self.validate_entity(name, text);

        if !contains_any(text, &self.index.cues.magic) && !contains_any(text, &self.index.cues.tech)
        {
            warnings.push(format!(
                "ability '{}' references neither a magic nor a tech cue",
                name
            ));
        }

        warnings
    }

    /// Lint a narrative passage (era transitions, backstories).
    pub fn validate_narrative(&self, text: &str) -> Vec<String> {
        if contains_any(text, &self.index.cues.lore) {
            Vec::new()
        } else {
            vec!["narrative references no known lore cue".into()]
        }
    }
}

fn contains_any(text: &str, cues: &[String]) -> bool {
    let lower = text.to_lowercase();
    cues.iter().any(|cue| lower.contains(&cue.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> LoreValidator {
        LoreValidator::new(Arc::new(LoreIndex::builtin()))
    }

    #[test]
    fn test_well_formed_entity_passes() {
        let warnings = validator().validate_entity(
            "Maren-Voss",
            "A warden of the relay towers of Low Meridian",
        );
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_missing_separator_is_flagged() {
        let warnings = validator().validate_entity("Marenvoss", "A warden of the colony");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("separator"));
    }

    #[test]
    fn test_missing_lore_cue_is_flagged() {
        let warnings = validator().validate_entity("Maren-Voss", "A person who exists");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("lore cue"));
    }

    #[test]
    fn test_ability_needs_magic_or_tech_cue() {
        let v = validator();
        let ok = v.validate_ability("Tide-Warding", "Banks the rift surge in warded glass");
        assert!(ok.is_empty(), "unexpected warnings: {:?}", ok);

        let bad = v.validate_ability("Loud-Shout", "Makes a colony noise, nothing more");
        assert!(bad.iter().any(|w| w.contains("neither a magic nor a tech")));
    }

    #[test]
    fn test_empty_description_not_flagged_for_cues() {
        let warnings = validator().validate_entity("Maren-Voss", "");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_narrative_cue_check() {
        let v = validator();
        assert!(v.validate_narrative("The Concord held the span").is_empty());
        assert_eq!(v.validate_narrative("Nothing of note happened").len(), 1);
    }
}
