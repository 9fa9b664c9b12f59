//! Parse structured enrichment responses
//!
//! Model output is untrusted: it may wrap the JSON in prose or fences, or
//! not contain valid JSON at all. A parse failure is a recoverable outcome
//! for the caller (the batch keeps its placeholders), so these return
//! `Option` rather than an error.

use serde::Deserialize;

/// One entry of a batched entity enrichment response
#[derive(Debug, Clone, Deserialize)]
pub struct EntityEnrichment {
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Extract the first JSON array from a response that may carry
/// surrounding text.
pub fn extract_json_array(response: &str) -> Option<&str> {
    let start = response.find('[')?;
    let end = response.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&response[start..=end])
}

/// Parse a batched entity enrichment response into typed entries
pub fn parse_entity_batch(response: &str) -> Option<Vec<EntityEnrichment>> {
    let json = extract_json_array(response)?;
    serde_json::from_str(json).ok()
}
