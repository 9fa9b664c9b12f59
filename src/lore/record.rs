//! Append-only audit records for enrichment decisions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{EntityId, RelationshipId};

/// What a record's text was generated for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoreRecordType {
    Name,
    Description,
    EraNarrative,
    RelationshipBackstory,
    TechMagic,
}

/// The graph object a record is attached to, when there is one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordTarget {
    Entity(EntityId),
    Relationship(RelationshipId),
}

/// One enrichment decision. Ids increase monotonically within a service
/// instance; the log is append-only for the run.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoreRecord {
    pub id: u64,
    pub record_type: LoreRecordType,
    pub target: Option<RecordTarget>,
    pub text: String,
    /// Served from the response cache rather than a fresh model call
    pub cached: bool,
    /// Validator findings; warnings never block the record
    pub warnings: Vec<String>,
    pub metadata: BTreeMap<String, String>,
}
