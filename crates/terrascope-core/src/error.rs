//! Error types for terrascope.

use thiserror::Error;

/// The main error type for terrascope operations.
#[derive(Error, Debug)]
pub enum TerrascopeError {
    /// No editable object is registered under the given index.
    #[error("object {0} not found")]
    ObjectNotFound(usize),

    /// A gizmo operation was requested while no object is being edited.
    #[error("no object is currently being edited")]
    NoActiveGizmo,

    /// A state was requested that has no instance in the state registry.
    #[error("state '{0}' is not registered")]
    StateNotRegistered(String),

    /// Activating or restoring states ran into a cycle.
    #[error("state dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    /// An inspector field could not be parsed as a number.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidField { field: &'static str, value: String },

    /// A projection definition is unusable.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for terrascope operations.
pub type Result<T> = std::result::Result<T, TerrascopeError>;
