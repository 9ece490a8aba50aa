use std::fmt;

/// What kind of object could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Container,
    Image,
}

/// Failure reported while talking to the container engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The identifier the caller supplied does not resolve.
    #[error("{}", not_found_message(.kind, .id))]
    NotFound { kind: Missing, id: String },

    /// Any other failure reported by the engine or its transport.
    #[error("{0}")]
    Engine(String),
}

impl EngineError {
    pub fn container_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: Missing::Container, id: id.into() }
    }

    pub fn image_not_found(id: impl Into<String>) -> Self {
        Self::NotFound { kind: Missing::Image, id: id.into() }
    }

    pub fn engine(message: impl fmt::Display) -> Self {
        Self::Engine(message.to_string())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn not_found_message(kind: &Missing, id: &str) -> String {
    match kind {
        Missing::Container => format!("No such container: {id}"),
        Missing::Image => format!("Image not found: {id}"),
    }
}
