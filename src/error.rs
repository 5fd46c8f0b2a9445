//! Engine error types.

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("no animation state found named '{0}'")]
    AnimationStateNotFound(String),
    #[error("animation state named '{0}' already exists")]
    DuplicateAnimationState(String),
    #[error("blend mask has {expected} entries but {actual} were supplied")]
    BlendMaskSizeMismatch { expected: usize, actual: usize },
    #[error("unknown vertex set {0}")]
    UnknownVertexSet(usize),
    #[error("index data length {0} is not a multiple of 3")]
    PartialTriangle(usize),
    #[error("vertex index {index} out of range for vertex set {vertex_set} ({vertex_count} vertices)")]
    VertexIndexOutOfRange {
        vertex_set: usize,
        index: u32,
        vertex_count: u32,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
