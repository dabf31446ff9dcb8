use thiserror::Error;

/// A failure while evaluating a spell calculation.
///
/// These never escape the rendering pipeline: callers log them and fall
/// back to the next resolution step.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("circular reference in spell calculations: {0}")]
    CircularReference(String),

    #[error("unsupported calculation type for \"{0}\"")]
    UnsupportedCalculation(String),

    #[error("spell calculation \"{0}\" not found")]
    UnknownCalculation(String),

    #[error("modified calculation \"{0}\" has no inner calculation")]
    MissingInnerCalculation(String),

    #[error("vector length mismatch: {left} vs {right}")]
    VectorLengthMismatch { left: usize, right: usize },
}

/// A failure while loading spell or community data from JSON.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("invalid {kind} JSON: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub fn json(kind: &'static str, source: serde_json::Error) -> Self {
        LoadError::Json { kind, source }
    }
}
