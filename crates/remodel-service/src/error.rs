//! Error types for the transformation coordinator

use thiserror::Error;
use transform_engine::{DefinitionError, EngineError};

/// Result type alias using ServiceError
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors surfaced by the coordinator, before or around engine execution
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No template is registered under the requested name
    #[error("No template registered under name '{0}'")]
    TemplateNotFound(String),

    /// More than one template candidate resolved; the coordinator never
    /// guesses
    #[error("Template name '{name}' resolves to {count} candidates")]
    AmbiguousTemplate { name: String, count: usize },

    /// The application folder is missing or not a directory
    #[error("Invalid application folder: {0}")]
    InvalidApplication(String),

    /// The configuration combines options that contradict each other
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Template or upgrade-path construction failed
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Engine-level failure during execution
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Zipping the transformed tree failed
    #[error("Compression error: {0}")]
    Compression(String),

    /// I/O error while staging or reporting
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The dispatched transformation task died
    #[error("Transformation task failed: {0}")]
    Internal(String),
}
