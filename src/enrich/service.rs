//! EnrichmentService - batched model enrichment with an audit trail
//!
//! Translates coarse entity/relationship/ability data into model-sourced
//! flavor text without ever destabilizing the simulation. Every operation
//! has a documented "nothing happened" outcome: disabled model, transport
//! failure, or an unparsable response leaves the graph exactly as it was.
//! Every applied enrichment appends a lore record.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::core::config::{EnrichmentConfig, EnrichmentMode};
use crate::core::types::{EntityId, EntityKind, RelationshipId};
use crate::engine::graph::{Entity, WorldGraph};
use crate::enrich::{parser, prompts};
use crate::llm::client::LlmClient;
use crate::lore::index::LoreIndex;
use crate::lore::record::{LoreRecord, LoreRecordType, RecordTarget};
use crate::lore::validator::LoreValidator;

pub struct EnrichmentService {
    client: LlmClient,
    index: Arc<LoreIndex>,
    validator: LoreValidator,
    config: EnrichmentConfig,
    records: Vec<LoreRecord>,
    next_record_id: u64,
    entities_enriched: usize,
    relationships_enriched: usize,
    eras_enriched: usize,
}

impl EnrichmentService {
    pub fn new(client: LlmClient, index: Arc<LoreIndex>, config: EnrichmentConfig) -> Self {
        let validator = LoreValidator::new(Arc::clone(&index));
        Self {
            client,
            index,
            validator,
            config,
            records: Vec::new(),
            next_record_id: 0,
            entities_enriched: 0,
            relationships_enriched: 0,
            eras_enriched: 0,
        }
    }

    /// Whether enrichment will do anything at all this run
    pub fn active(&self) -> bool {
        self.config.mode != EnrichmentMode::Off && self.client.enabled()
    }

    /// Whether the underlying model is reachable (for the export log)
    pub fn model_enabled(&self) -> bool {
        self.client.enabled()
    }

    /// The append-only audit log of every enrichment decision
    pub fn records(&self) -> &[LoreRecord] {
        &self.records
    }

    /// The underlying client, e.g. for seeding the response cache
    pub fn client(&self) -> &LlmClient {
        &self.client
    }

    /// Enrich entities in batches of `batch_size`. A failed or unparsable
    /// batch leaves its entities untouched and never blocks later batches.
    pub async fn enrich_entities(&mut self, graph: &mut WorldGraph, ids: &[EntityId]) {
        if !self.active() {
            return;
        }
        let limit =
            self.category_remaining(self.config.max_entity_enrichments, self.entities_enriched);
        let selected: Vec<EntityId> = ids
            .iter()
            .copied()
            .filter(|id| graph.entity(*id).is_some())
            .take(limit)
            .collect();

        let batch_size = self.config.batch_size.max(1);
        for chunk in selected.chunks(batch_size) {
            self.enrich_entity_chunk(graph, chunk).await;
        }
    }

    async fn enrich_entity_chunk(&mut self, graph: &mut WorldGraph, chunk: &[EntityId]) {
        let (system, user) = {
            let entities: Vec<&Entity> =
                chunk.iter().filter_map(|id| graph.entity(*id)).collect();
            if entities.is_empty() {
                return;
            }
            prompts::entity_batch(&self.index, &entities)
        };

        let request = self.client.request(&system, &user, true);
        let completion = self.client.complete(&request).await;
        if completion.skipped {
            return;
        }

        let Some(items) = parser::parse_entity_batch(&completion.text) else {
            tracing::warn!(
                batch = chunk.len(),
                "entity enrichment response was not valid structured text"
            );
            self.push_record(
                LoreRecordType::Description,
                None,
                String::new(),
                completion.cached,
                vec!["response was not a valid entity enrichment array".into()],
                BTreeMap::from([
                    ("operation".into(), "entity_batch".into()),
                    ("batch_size".into(), chunk.len().to_string()),
                ]),
            );
            return;
        };

        for item in items {
            let entity_id = EntityId(item.id);
            // Only ids from this batch may be touched
            if !chunk.contains(&entity_id) {
                continue;
            }
            let new_name = item
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty());
            let new_description = item
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty());
            if new_name.is_none() && new_description.is_none() {
                continue;
            }

            let (name, description, kind) = {
                let Some(entity) = graph.entity_mut(entity_id) else {
                    continue;
                };
                if let Some(name) = &new_name {
                    entity.name = name.clone();
                }
                if let Some(description) = &new_description {
                    entity.description = description.clone();
                }
                entity.enriched = true;
                (
                    entity.name.clone(),
                    entity.description.clone(),
                    entity.kind.clone(),
                )
            };

            let warnings = self.validator.validate_entity(&name, &description);
            let metadata = BTreeMap::from([("kind".into(), kind.as_str().to_string())]);
            if new_name.is_some() {
                self.push_record(
                    LoreRecordType::Name,
                    Some(RecordTarget::Entity(entity_id)),
                    name.clone(),
                    completion.cached,
                    warnings.clone(),
                    metadata.clone(),
                );
            }
            if new_description.is_some() {
                self.push_record(
                    LoreRecordType::Description,
                    Some(RecordTarget::Entity(entity_id)),
                    description,
                    completion.cached,
                    warnings,
                    metadata,
                );
            }
            self.entities_enriched += 1;
        }
    }

    /// One backstory request per relationship
    pub async fn enrich_relationships(&mut self, graph: &mut WorldGraph, ids: &[RelationshipId]) {
        if !self.active() {
            return;
        }
        let mut remaining = self.category_remaining(
            self.config.max_relationship_enrichments,
            self.relationships_enriched,
        );

        for id in ids {
            if remaining == 0 {
                break;
            }
            let Some((system, user, kind)) = ({
                graph.relationship(*id).and_then(|rel| {
                    let src = graph.entity(rel.src)?;
                    let dst = graph.entity(rel.dst)?;
                    let (system, user) =
                        prompts::relationship_backstory(&self.index, src, dst, &rel.kind);
                    Some((system, user, rel.kind.clone()))
                })
            }) else {
                continue;
            };

            let request = self.client.request(&system, &user, false);
            let completion = self.client.complete(&request).await;
            if completion.skipped || completion.text.trim().is_empty() {
                continue;
            }

            let text = completion.text.trim().to_string();
            if let Some(rel) = graph.relationship_mut(*id) {
                rel.backstory = Some(text.clone());
            }
            let warnings = self.validator.validate_narrative(&text);
            self.push_record(
                LoreRecordType::RelationshipBackstory,
                Some(RecordTarget::Relationship(*id)),
                text,
                completion.cached,
                warnings,
                BTreeMap::from([("relationship_kind".into(), kind)]),
            );
            self.relationships_enriched += 1;
            remaining -= 1;
        }
    }

    /// Flavor text for a single ability entity
    pub async fn enrich_ability(&mut self, graph: &mut WorldGraph, id: EntityId) {
        if !self.active() {
            return;
        }
        if self.category_remaining(self.config.max_entity_enrichments, self.entities_enriched) == 0
        {
            return;
        }
        let Some((system, user, name)) = ({
            graph.entity(id).and_then(|entity| {
                if entity.kind != EntityKind::Ability {
                    return None;
                }
                let (system, user) = prompts::ability_flavor(&self.index, entity);
                Some((system, user, entity.name.clone()))
            })
        }) else {
            return;
        };

        let request = self.client.request(&system, &user, false);
        let completion = self.client.complete(&request).await;
        if completion.skipped || completion.text.trim().is_empty() {
            return;
        }

        let text = completion.text.trim().to_string();
        if let Some(entity) = graph.entity_mut(id) {
            entity.description = text.clone();
            entity.enriched = true;
        }
        let warnings = self.validator.validate_ability(&name, &text);
        self.push_record(
            LoreRecordType::TechMagic,
            Some(RecordTarget::Entity(id)),
            text,
            completion.cached,
            warnings,
            BTreeMap::new(),
        );
        self.entities_enriched += 1;
    }

    /// Narrative for one era transition. Returns the text on success.
    pub async fn era_narrative(&mut self, from: &str, to: &str, epoch: u64) -> Option<String> {
        if !self.active() {
            return None;
        }
        if self.category_remaining(self.config.max_era_enrichments, self.eras_enriched) == 0 {
            return None;
        }

        let (system, user) = prompts::era_narrative(&self.index, from, to, epoch);
        let request = self.client.request(&system, &user, false);
        let completion = self.client.complete(&request).await;
        if completion.skipped || completion.text.trim().is_empty() {
            return None;
        }

        let text = completion.text.trim().to_string();
        let warnings = self.validator.validate_narrative(&text);
        self.push_record(
            LoreRecordType::EraNarrative,
            None,
            text.clone(),
            completion.cached,
            warnings,
            BTreeMap::from([
                ("from".into(), from.to_string()),
                ("to".into(), to.to_string()),
                ("epoch".into(), epoch.to_string()),
            ]),
        );
        self.eras_enriched += 1;
        Some(text)
    }

    /// Remaining allowance for a category; caps bind in `Partial` mode only
    fn category_remaining(&self, cap: Option<usize>, used: usize) -> usize {
        match (self.config.mode, cap) {
            (EnrichmentMode::Partial, Some(cap)) => cap.saturating_sub(used),
            _ => usize::MAX,
        }
    }

    fn push_record(
        &mut self,
        record_type: LoreRecordType,
        target: Option<RecordTarget>,
        text: String,
        cached: bool,
        warnings: Vec<String>,
        metadata: BTreeMap<String, String>,
    ) {
        let id = self.next_record_id;
        self.next_record_id += 1;
        self.records.push(LoreRecord {
            id,
            record_type,
            target,
            text,
            cached,
            warnings,
            metadata,
        });
    }
}
