//! WorldEngine - the simulation scheduler
//!
//! Owns the graph, the pressure map, and the tick/epoch/era counters, and
//! drives the run: systems every tick in registration order, growth
//! templates on growth ticks, relationship commits through the budget
//! guard, era transitions at epoch boundaries. The loop is strictly
//! single-threaded; enrichment work is queued as graph objects appear and
//! executed behind the `finalize_enrichments` barrier, so `run()` never
//! suspends and export never observes a half-applied batch.

pub mod budget;
pub mod export;
pub mod graph;
pub mod pressure;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, WorldloomError};
use crate::core::types::{EntityId, EntityKind, RelationshipId, SimClock};
use crate::engine::budget::RelationshipBudget;
use crate::engine::export::{
    EnrichmentLog, EraTransitionEvent, GraphDocument, GraphEdge, GraphNode, RunStats,
    ValidationSummary, WorldExport,
};
use crate::engine::graph::{EntityRef, ProposedEntity, WorldGraph};
use crate::enrich::EnrichmentService;
use crate::lore::record::LoreRecord;
use crate::systems::{System, SystemCtx};
use crate::templates::{GrowthCtx, GrowthTemplate};

/// Enrichment work accumulated during the run, drained at finalization
#[derive(Default)]
struct PendingEnrichment {
    entities: Vec<EntityId>,
    relationships: Vec<RelationshipId>,
    abilities: Vec<EntityId>,
    /// Indices into `era_log` awaiting a narrative
    eras: Vec<usize>,
}

pub struct WorldEngine {
    config: EngineConfig,
    graph: WorldGraph,
    pressures: pressure::PressureMap,
    clock: SimClock,
    era_index: usize,
    templates: Vec<Box<dyn GrowthTemplate>>,
    systems: Vec<Box<dyn System>>,
    rng: ChaCha8Rng,
    budget: RelationshipBudget,
    enrichment: EnrichmentService,
    pending: PendingEnrichment,
    era_log: Vec<EraTransitionEvent>,
    growth_phases: u64,
}

impl WorldEngine {
    /// Build an engine over a validated config and seed entities.
    /// Templates and systems are registered separately, once, before
    /// `run()`.
    pub fn new(
        config: EngineConfig,
        seeds: Vec<ProposedEntity>,
        enrichment: EnrichmentService,
    ) -> Result<Self> {
        config.validate()?;

        let clock = SimClock::start(config.eras[0].name.clone());
        let pressures = pressure::PressureMap::new(config.initial_pressures.clone());
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        let budget = RelationshipBudget::new(&config.relationship_budget);

        let mut engine = Self {
            config,
            graph: WorldGraph::new(),
            pressures,
            clock,
            era_index: 0,
            templates: Vec::new(),
            systems: Vec::new(),
            rng,
            budget,
            enrichment,
            pending: PendingEnrichment::default(),
            era_log: Vec::new(),
            growth_phases: 0,
        };

        for seed in seeds {
            engine.commit_entity(seed);
        }

        Ok(engine)
    }

    /// `new` plus the stock template and system registries
    pub fn new_standard(
        config: EngineConfig,
        seeds: Vec<ProposedEntity>,
        enrichment: EnrichmentService,
    ) -> Result<Self> {
        let mut engine = Self::new(config, seeds, enrichment)?;
        for template in crate::templates::standard() {
            engine.register_template(template);
        }
        for system in crate::systems::standard() {
            engine.register_system(system);
        }
        Ok(engine)
    }

    /// Register a growth template. Registration order is firing order.
    pub fn register_template(&mut self, template: Box<dyn GrowthTemplate>) {
        self.templates.push(template);
    }

    /// Register a per-tick system. Registration order is execution order.
    pub fn register_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
    }

    /// Drive the simulation from the current tick to `max_ticks`.
    /// Synchronous: enrichment is queued, not awaited, here.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            max_ticks = self.config.max_ticks,
            seed = self.config.seed,
            "starting world-history run"
        );

        while self.clock.tick < self.config.max_ticks {
            self.step()?;
        }

        tracing::info!(
            entities = self.graph.entity_count(),
            relationships = self.graph.relationships().len(),
            era = %self.clock.era,
            "run complete"
        );
        Ok(())
    }

    fn step(&mut self) -> Result<()> {
        self.budget.begin_tick();
        self.run_systems()?;

        if self.is_growth_tick() {
            self.budget.begin_growth_phase();
            self.growth_phases += 1;
            self.run_growth_phase()?;
        }

        self.clock.tick += 1;
        if self.clock.tick % self.config.epoch_length == 0 {
            self.clock.epoch += 1;
            self.evaluate_era_transition();
        }
        Ok(())
    }

    fn is_growth_tick(&self) -> bool {
        self.clock.tick > 0 && self.clock.tick % self.config.simulation_ticks_per_growth == 0
    }

    fn run_systems(&mut self) -> Result<()> {
        let mut committed = Vec::new();
        for system in &self.systems {
            let mut ctx = SystemCtx {
                graph: &mut self.graph,
                pressures: &mut self.pressures,
                clock: &self.clock,
                rng: &mut self.rng,
                budget: &mut self.budget,
                committed: &mut committed,
            };
            system.apply(&mut ctx).map_err(|e| match e {
                e @ WorldloomError::SystemFailure { .. } => e,
                other => WorldloomError::SystemFailure {
                    name: system.name().to_string(),
                    message: other.to_string(),
                },
            })?;
        }
        self.pending.relationships.extend(committed);
        Ok(())
    }

    fn run_growth_phase(&mut self) -> Result<()> {
        // Collect every eligible template's proposal against the
        // phase-start snapshot, in registration order.
        let mut proposals = Vec::new();
        for template in &self.templates {
            let ctx = GrowthCtx {
                graph: &self.graph,
                pressures: &self.pressures,
                clock: &self.clock,
                target_per_kind: self.config.target_entities_per_kind,
            };
            if !template.eligible(&ctx) {
                continue;
            }
            let proposal = template.propose(&ctx, &mut self.rng).map_err(|e| match e {
                e @ WorldloomError::TemplateFailure { .. } => e,
                other => WorldloomError::TemplateFailure {
                    name: template.name().to_string(),
                    message: other.to_string(),
                },
            })?;
            if !proposal.is_empty() {
                proposals.push(proposal);
            }
        }

        // Entities commit unconditionally; the per-kind target is advisory
        // and was already consulted by eligibility.
        let mut id_maps: Vec<Vec<EntityId>> = Vec::with_capacity(proposals.len());
        for proposal in &mut proposals {
            let mut ids = Vec::with_capacity(proposal.entities.len());
            for entity in proposal.entities.drain(..) {
                ids.push(self.commit_entity(entity));
            }
            id_maps.push(ids);
        }

        // Relationships commit in strict proposal order while the budget
        // counters hold out; the rest of the phase drops silently.
        for (proposal, ids) in proposals.iter().zip(&id_maps) {
            for rel in &proposal.relationships {
                let (Some(src), Some(dst)) = (
                    self.resolve_ref(rel.src, ids),
                    self.resolve_ref(rel.dst, ids),
                ) else {
                    continue;
                };
                if src == dst || self.graph.has_relationship(src, dst, &rel.kind) {
                    continue;
                }
                if !self.budget.try_commit() {
                    continue;
                }
                let id = self.graph.insert_relationship(
                    src,
                    dst,
                    rel.kind.clone(),
                    rel.strength,
                    rel.metadata.clone(),
                    &self.clock,
                );
                self.pending.relationships.push(id);
            }
        }

        tracing::debug!(
            tick = self.clock.tick,
            entities = self.graph.entity_count(),
            committed = self.budget.committed_this_phase(),
            "growth phase complete"
        );
        Ok(())
    }

    fn commit_entity(&mut self, entity: ProposedEntity) -> EntityId {
        let is_ability = entity.kind == EntityKind::Ability;
        let id = self.graph.insert_entity(entity, &self.clock);
        self.pending.entities.push(id);
        if is_ability {
            self.pending.abilities.push(id);
        }
        id
    }

    fn resolve_ref(&self, entity_ref: EntityRef, new_ids: &[EntityId]) -> Option<EntityId> {
        match entity_ref {
            EntityRef::Existing(id) => self.graph.entity(id).map(|e| e.id),
            EntityRef::New(index) => new_ids.get(index).copied(),
        }
    }

    fn evaluate_era_transition(&mut self) {
        let Some(era) = self.config.eras.get(self.era_index) else {
            return;
        };
        let Some(transition) = &era.transition else {
            return;
        };
        if self.era_index + 1 >= self.config.eras.len() {
            return;
        }
        if self.pressures.get(&transition.pressure) < transition.threshold {
            return;
        }

        let from = era.name.clone();
        let to = self.config.eras[self.era_index + 1].name.clone();
        self.era_index += 1;
        self.clock.era = to.clone();
        tracing::info!(
            %from,
            %to,
            epoch = self.clock.epoch,
            "era transition"
        );
        self.era_log.push(EraTransitionEvent {
            from,
            to,
            tick: self.clock.tick,
            epoch: self.clock.epoch,
            narrative: None,
        });
        self.pending.eras.push(self.era_log.len() - 1);
    }

    /// The enrichment barrier: execute and await everything queued during
    /// the run. Must complete before `export_state`; enrichment failures
    /// never surface here — affected objects simply keep their
    /// placeholders.
    pub async fn finalize_enrichments(&mut self) {
        let pending = std::mem::take(&mut self.pending);

        self.enrichment
            .enrich_entities(&mut self.graph, &pending.entities)
            .await;
        self.enrichment
            .enrich_relationships(&mut self.graph, &pending.relationships)
            .await;
        for id in pending.abilities {
            self.enrichment.enrich_ability(&mut self.graph, id).await;
        }
        for index in pending.eras {
            let Some(event) = self.era_log.get(index).cloned() else {
                continue;
            };
            if let Some(text) = self
                .enrichment
                .era_narrative(&event.from, &event.to, event.epoch)
                .await
            {
                self.era_log[index].narrative = Some(text);
            }
        }
    }

    /// Serializable snapshot of the world and run statistics
    pub fn export_state(&self) -> WorldExport {
        let mut entities_by_kind: BTreeMap<String, usize> = BTreeMap::new();
        for entity in self.graph.entities() {
            *entities_by_kind
                .entry(entity.kind.as_str().to_string())
                .or_default() += 1;
        }

        let records = self.enrichment.records();
        let validation = ValidationSummary {
            total_warnings: records.iter().map(|r| r.warnings.len()).sum(),
            records_with_warnings: records.iter().filter(|r| !r.warnings.is_empty()).count(),
        };

        WorldExport {
            tick: self.clock.tick,
            epoch: self.clock.epoch,
            era: self.clock.era.clone(),
            entities: self.graph.entities().cloned().collect(),
            relationships: self.graph.relationships().to_vec(),
            pressures: self.pressures.clone(),
            era_log: self.era_log.clone(),
            validation,
            stats: RunStats {
                ticks: self.clock.tick,
                epochs: self.clock.epoch,
                growth_phases: self.growth_phases,
                entities_created: self.graph.entity_count(),
                entities_by_kind,
                relationships_committed: self.graph.relationships().len(),
                relationships_dropped: self.budget.dropped(),
                enrichment_records: records.len(),
            },
        }
    }

    /// Node/edge document for graph visualization
    pub fn graph_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self
                .graph
                .entities()
                .map(|e| GraphNode {
                    id: e.id,
                    label: e.name.clone(),
                    kind: e.kind.as_str().to_string(),
                    prominence: e.prominence,
                })
                .collect(),
            edges: self
                .graph
                .relationships()
                .iter()
                .map(|r| GraphEdge {
                    src: r.src,
                    dst: r.dst,
                    kind: r.kind.clone(),
                    strength: r.strength,
                    active: r.active,
                })
                .collect(),
        }
    }

    /// The full enrichment audit log document
    pub fn enrichment_log(&self) -> EnrichmentLog {
        EnrichmentLog {
            model_enabled: self.enrichment.model_enabled(),
            records: self.enrichment.records().to_vec(),
        }
    }

    /// The append-only lore records accumulated by enrichment
    pub fn lore_records(&self) -> &[LoreRecord] {
        self.enrichment.records()
    }

    pub fn tick(&self) -> u64 {
        self.clock.tick
    }

    pub fn epoch(&self) -> u64 {
        self.clock.epoch
    }

    pub fn era(&self) -> &str {
        &self.clock.era
    }
}
