use thiserror::Error;

/// Errors surfaced by the search and filter engines.
///
/// Every variant is recoverable: the engine state is left as it was before
/// the failing call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActaError {
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
    #[error("unknown saved filter: {0}")]
    UnknownSavedFilter(String),
    #[error("type mismatch for filter {id}: expected {expected}, got {got}")]
    TypeMismatch { id: String, expected: &'static str, got: &'static str },
    #[error("duplicate filter id: {0}")]
    DuplicateFilter(String),
    #[error("invalid value for {kind} filter: {input}")]
    InvalidValue { kind: &'static str, input: String },
    #[error("runtime: {0}")]
    Runtime(String),
}

pub type ActaResult<T> = Result<T, ActaError>;
