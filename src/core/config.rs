//! Engine configuration
//!
//! Built once by the driver, consumed as an immutable snapshot. The engine
//! never mutates it after construction; `validate()` rejects malformed
//! combinations before a run starts.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::error::{Result, WorldloomError};

/// Full configuration snapshot for one engine instance
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seed for the deterministic RNG driving templates and systems
    pub seed: u64,
    /// Total ticks to simulate; `run()` stops once this is reached
    pub max_ticks: u64,
    /// Ticks per epoch; era transitions are evaluated only at epoch boundaries
    pub epoch_length: u64,
    /// Growth templates fire every this many ticks
    pub simulation_ticks_per_growth: u64,
    /// Soft per-kind population target. Advisory only: it gates template
    /// eligibility, the engine never rejects a proposed entity against it.
    pub target_entities_per_kind: usize,
    pub relationship_budget: RelationshipBudgetConfig,
    /// Ordered era list; each era may name the pressure threshold that
    /// advances to the next entry
    pub eras: Vec<EraConfig>,
    /// Initial pressure values, clamped to [0, 1]
    pub initial_pressures: BTreeMap<String, f64>,
    pub model: ModelConfig,
    pub enrichment: EnrichmentConfig,
}

/// Hard caps on relationship creation rate
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RelationshipBudgetConfig {
    pub max_per_simulation_tick: usize,
    pub max_per_growth_phase: usize,
}

/// One era in the timeline
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EraConfig {
    pub name: String,
    /// Threshold that advances to the next era in the list; `None` makes
    /// this era terminal
    pub transition: Option<EraTransitionConfig>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EraTransitionConfig {
    /// Pressure name evaluated at epoch boundaries
    pub pressure: String,
    /// Transition fires once the pressure reaches this value
    pub threshold: f64,
}

/// Hosted-model configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelConfig {
    pub enabled: bool,
    pub model: String,
    pub api_url: String,
    pub api_key: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            model: String::new(),
            api_url: "https://api.anthropic.com/v1/messages".into(),
            api_key: String::new(),
            max_tokens: 1024,
            temperature: 0.8,
        }
    }
}

impl ModelConfig {
    /// Build from environment variables, disabled when no credential is set.
    ///
    /// Reads LOOM_LLM_API_KEY, LOOM_LLM_API_URL, LOOM_LLM_MODEL.
    pub fn from_env() -> Self {
        let api_key = std::env::var("LOOM_LLM_API_KEY").unwrap_or_default();
        let api_url = std::env::var("LOOM_LLM_API_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com/v1/messages".into());
        let model =
            std::env::var("LOOM_LLM_MODEL").unwrap_or_else(|_| "claude-3-haiku-20240307".into());
        Self {
            enabled: !api_key.is_empty(),
            model,
            api_url,
            api_key,
            ..Self::default()
        }
    }
}

/// How much of the world gets model-sourced text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    #[default]
    Off,
    /// Enrich up to the per-category caps, then stop
    Partial,
    Full,
}

/// Enrichment batching and cap configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrichmentConfig {
    pub mode: EnrichmentMode,
    /// Entities per batched model call
    pub batch_size: usize,
    /// Per-run caps, honored in `Partial` mode only
    pub max_entity_enrichments: Option<usize>,
    pub max_relationship_enrichments: Option<usize>,
    pub max_era_enrichments: Option<usize>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            mode: EnrichmentMode::Off,
            batch_size: 8,
            max_entity_enrichments: None,
            max_relationship_enrichments: None,
            max_era_enrichments: None,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            max_ticks: 200,
            epoch_length: 10,
            simulation_ticks_per_growth: 5,
            target_entities_per_kind: 12,
            relationship_budget: RelationshipBudgetConfig {
                max_per_simulation_tick: 4,
                max_per_growth_phase: 10,
            },
            eras: vec![
                EraConfig {
                    name: "Founding".into(),
                    transition: Some(EraTransitionConfig {
                        pressure: "ambition".into(),
                        threshold: 0.5,
                    }),
                },
                EraConfig {
                    name: "Expansion".into(),
                    transition: Some(EraTransitionConfig {
                        pressure: "unrest".into(),
                        threshold: 0.6,
                    }),
                },
                EraConfig {
                    name: "Fracture".into(),
                    transition: None,
                },
            ],
            initial_pressures: BTreeMap::from([
                ("ambition".into(), 0.2),
                ("unrest".into(), 0.1),
                ("order".into(), 0.3),
                ("mystery".into(), 0.2),
                ("expansion".into(), 0.2),
            ]),
            model: ModelConfig::default(),
            enrichment: EnrichmentConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check internal consistency before building an engine
    pub fn validate(&self) -> Result<()> {
        if self.epoch_length == 0 {
            return Err(WorldloomError::InvalidConfig(
                "epoch_length must be at least 1".into(),
            ));
        }
        if self.simulation_ticks_per_growth == 0 {
            return Err(WorldloomError::InvalidConfig(
                "simulation_ticks_per_growth must be at least 1".into(),
            ));
        }
        if self.eras.is_empty() {
            return Err(WorldloomError::InvalidConfig(
                "at least one era is required".into(),
            ));
        }
        if self.enrichment.batch_size == 0 {
            return Err(WorldloomError::InvalidConfig(
                "enrichment batch_size must be at least 1".into(),
            ));
        }
        for (name, value) in &self.initial_pressures {
            if !(0.0..=1.0).contains(value) {
                return Err(WorldloomError::InvalidConfig(format!(
                    "initial pressure '{}' ({}) outside [0, 1]",
                    name, value
                )));
            }
        }
        for era in &self.eras {
            if let Some(t) = &era.transition {
                if !self.initial_pressures.contains_key(&t.pressure) {
                    return Err(WorldloomError::InvalidConfig(format!(
                        "era '{}' transitions on unknown pressure '{}'",
                        era.name, t.pressure
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_zero_epoch_length_rejected() {
        let config = EngineConfig {
            epoch_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_eras_rejected() {
        let config = EngineConfig {
            eras: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_transition_pressure_rejected() {
        let mut config = EngineConfig::default();
        config.eras[0].transition = Some(EraTransitionConfig {
            pressure: "nonexistent".into(),
            threshold: 0.5,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_out_of_range_pressure_rejected() {
        let mut config = EngineConfig::default();
        config.initial_pressures.insert("ambition".into(), 1.5);
        assert!(config.validate().is_err());
    }
}
