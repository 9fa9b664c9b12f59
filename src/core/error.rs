use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorldloomError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Entity not found: {0:?}")]
    EntityNotFound(crate::core::types::EntityId),

    #[error("Relationship not found: {0:?}")]
    RelationshipNotFound(crate::core::types::RelationshipId),

    #[error("System '{name}' failed: {message}")]
    SystemFailure { name: String, message: String },

    #[error("Growth template '{name}' failed: {message}")]
    TemplateFailure { name: String, message: String },

    #[error("Lore index error: {0}")]
    LoreIndex(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorldloomError>;
