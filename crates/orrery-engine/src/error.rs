use crate::api::types::RenderableId;

/// Errors surfaced by the engine and its rendering backend.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("engine used before init")]
    NotInitialized,
    #[error("{what} capacity exceeded (limit {limit})")]
    CapacityExceeded { what: &'static str, limit: usize },
    #[error("renderable {0:?} does not exist")]
    MissingRenderable(RenderableId),
    #[error("invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
    #[error("initialization failed: {0}")]
    Init(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
