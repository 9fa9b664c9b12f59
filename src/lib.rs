//! Worldloom - tick-based procedural world-history generation
//!
//! Starting from a seed set of entities, the engine advances simulated
//! time, grows an entity graph under hard relationship budgets, and
//! optionally asks a hosted language model to enrich names, descriptions,
//! backstories, and era narratives — validating generated text against a
//! fixed lore corpus and degrading gracefully whenever the model is
//! disabled or unreachable.

pub mod core;
pub mod engine;
pub mod enrich;
pub mod llm;
pub mod lore;
pub mod systems;
pub mod templates;
