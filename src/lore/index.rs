//! The lore index: the fixed reference corpus for one run
//!
//! Parsed once from a TOML document (or built from the bundled default
//! corpus) and held read-only for the run's lifetime. Enrichment prompts
//! embed slices of it; the validator lints generated text against it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, WorldloomError};

/// One named colony the world is built around
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColonyIdentity {
    pub name: String,
    pub theme: String,
    pub description: String,
}

/// Naming convention generated names are expected to follow
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamingConvention {
    /// Separators a well-formed name contains at least one of
    pub separators: Vec<String>,
}

/// Cue terms the validator looks for in generated text
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CueLexicon {
    /// General lore cues expected in descriptions
    pub lore: Vec<String>,
    /// Magic-flavored cues for ability text
    pub magic: Vec<String>,
    /// Tech-flavored cues for ability text
    pub tech: Vec<String>,
}

/// Immutable reference corpus, loaded once per run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoreIndex {
    pub tensions: Vec<String>,
    pub tech_notes: Vec<String>,
    pub magic_notes: Vec<String>,
    pub canon_facts: Vec<String>,
    pub naming: NamingConvention,
    pub cues: CueLexicon,
    pub colonies: Vec<ColonyIdentity>,
}

impl LoreIndex {
    /// Parse a corpus from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| WorldloomError::LoreIndex(e.to_string()))
    }

    /// Load a corpus from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// The bundled default corpus, used when no document is supplied
    pub fn builtin() -> Self {
        Self {
            tensions: vec![
                "The span-wardens ration aether while the deep shafts flood".into(),
                "Verge clans refuse the Concord's tithe of first-forged steel".into(),
                "Relay towers fail whenever the rift-tide crests".into(),
            ],
            tech_notes: vec![
                "Relay towers carry signal between colonies on coherent light".into(),
                "Forge-presses temper rift-glass into load-bearing struts".into(),
                "Aether condensers are licensed, numbered, and jealously audited".into(),
            ],
            magic_notes: vec![
                "Rift-tide surges can be banked in glass but never in metal".into(),
                "Warding requires a spoken name and a drop of colony soil".into(),
                "The veil thins at epoch turns; the wardens keep the count".into(),
            ],
            canon_facts: vec![
                "Three founding colonies survived the Sundering".into(),
                "The Concord charter binds every colony to the relay network".into(),
                "No colony has ever retaken ground lost to the verge".into(),
            ],
            naming: NamingConvention {
                separators: vec!["-".into(), " ".into()],
            },
            cues: CueLexicon {
                lore: vec![
                    "colony".into(),
                    "span".into(),
                    "verge".into(),
                    "concord".into(),
                    "rift".into(),
                    "aether".into(),
                    "warden".into(),
                    "relay".into(),
                ],
                magic: vec![
                    "rift".into(),
                    "veil".into(),
                    "warding".into(),
                    "aether".into(),
                ],
                tech: vec![
                    "relay".into(),
                    "forge".into(),
                    "condenser".into(),
                    "rift-glass".into(),
                ],
            },
            colonies: vec![
                ColonyIdentity {
                    name: "Aurelia Span".into(),
                    theme: "terraced arcology above the flood line".into(),
                    description: "Oldest of the founding colonies, seat of the Concord".into(),
                },
                ColonyIdentity {
                    name: "Kessel-Verge".into(),
                    theme: "frontier forge-town on the rift margin".into(),
                    description: "Supplies rift-glass to the span in exchange for grain".into(),
                },
                ColonyIdentity {
                    name: "Low Meridian".into(),
                    theme: "relay nexus sunk into the old seabed".into(),
                    description: "Keeps the relay network alive through the tide surges".into(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_corpus_is_populated() {
        let index = LoreIndex::builtin();
        assert!(!index.colonies.is_empty());
        assert!(!index.cues.lore.is_empty());
        assert!(!index.naming.separators.is_empty());
    }

    #[test]
    fn test_from_toml_str() {
        let doc = r#"
tensions = ["old debts"]
tech_notes = ["signal towers"]
magic_notes = ["the veil"]
canon_facts = ["three colonies"]

[naming]
separators = ["-"]

[cues]
lore = ["colony"]
magic = ["veil"]
tech = ["tower"]

[[colonies]]
name = "Testfall"
theme = "test"
description = "a test colony"
"#;
        let index = LoreIndex::from_toml_str(doc).unwrap();
        assert_eq!(index.colonies.len(), 1);
        assert_eq!(index.colonies[0].name, "Testfall");
        assert_eq!(index.tensions, vec!["old debts".to_string()]);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(LoreIndex::from_toml_str("not [ valid").is_err());
    }
}
