//! Exported run artifacts
//!
//! Serializable snapshots the driver turns into flat output files: the
//! world-state document, the node/edge graph document, and the enrichment
//! log. The engine itself writes nothing to disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{EntityId, Prominence};
use crate::engine::graph::{Entity, Relationship};
use crate::engine::pressure::PressureMap;
use crate::lore::record::LoreRecord;

/// One era transition that occurred during the run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EraTransitionEvent {
    pub from: String,
    pub to: String,
    pub tick: u64,
    pub epoch: u64,
    /// Model-sourced narrative, when enrichment produced one
    pub narrative: Option<String>,
}

/// Roll-up of validator findings across the enrichment log
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_warnings: usize,
    pub records_with_warnings: usize,
}

/// Run statistics for the world-state document
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunStats {
    pub ticks: u64,
    pub epochs: u64,
    pub growth_phases: u64,
    pub entities_created: usize,
    pub entities_by_kind: BTreeMap<String, usize>,
    pub relationships_committed: usize,
    pub relationships_dropped: u64,
    pub enrichment_records: usize,
}

/// Complete world-state snapshot
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldExport {
    pub tick: u64,
    pub epoch: u64,
    pub era: String,
    pub entities: Vec<Entity>,
    pub relationships: Vec<Relationship>,
    pub pressures: PressureMap,
    pub era_log: Vec<EraTransitionEvent>,
    pub validation: ValidationSummary,
    pub stats: RunStats,
}

impl WorldExport {
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn summary(&self) -> String {
        format!(
            "Simulated {} ticks ({} epochs), era of {}\n{} entities, {} relationships ({} dropped), {} enrichment records",
            self.stats.ticks,
            self.stats.epochs,
            self.era,
            self.stats.entities_created,
            self.stats.relationships_committed,
            self.stats.relationships_dropped,
            self.stats.enrichment_records,
        )
    }
}

/// Node/edge document for graph visualization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: EntityId,
    pub label: String,
    pub kind: String,
    pub prominence: Prominence,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphEdge {
    pub src: EntityId,
    pub dst: EntityId,
    pub kind: String,
    pub strength: f64,
    pub active: bool,
}

/// Every lore record from the run, plus whether the model was reachable
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnrichmentLog {
    pub model_enabled: bool,
    pub records: Vec<LoreRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_to_json() {
        let export = WorldExport {
            tick: 5,
            epoch: 1,
            era: "Founding".into(),
            entities: vec![],
            relationships: vec![],
            pressures: PressureMap::default(),
            era_log: vec![],
            validation: ValidationSummary::default(),
            stats: RunStats {
                ticks: 5,
                epochs: 1,
                growth_phases: 2,
                entities_created: 0,
                entities_by_kind: BTreeMap::new(),
                relationships_committed: 0,
                relationships_dropped: 0,
                enrichment_records: 0,
            },
        };
        let json = export.to_json();
        assert!(json.contains("\"era\": \"Founding\""));
        assert!(export.summary().contains("5 ticks"));
    }
}
