use hecs::Entity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("construct {0:?} does not exist in this document")]
    NoSuchConstruct(Entity),

    #[error("construct {entity:?} lacks the {capability} capability")]
    MissingCapability { entity: Entity, capability: &'static str },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NotationError {
    #[error("malformed notation at offset {offset} near {near:?}")]
    Syntax { offset: usize, near: String },

    #[error("unknown phrase tag: {0}")]
    UnknownPhraseTag(String),

    #[error("unknown word tag: {0}")]
    UnknownWordTag(String),

    #[error("unknown entity label: {0}")]
    UnknownEntityLabel(String),
}
