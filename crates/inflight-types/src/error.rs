use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("object key resolves to nothing: path {path:?}, name {name:?}")]
    EmptyKey { path: String, name: String },
}
