//! Error types for the transformation engine

use thiserror::Error;

/// Result type alias using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while defining or executing a transformation
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed template, step or upgrade path configuration.
    /// Raised when the definition is built, before any execution begins.
    #[error("Definition error: {0}")]
    Definition(#[from] DefinitionError),

    /// Transformation context access failure
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    /// The effective target path of a step could not be resolved
    #[error("Could not resolve target path for step '{step}': {reason}")]
    TargetResolution { step: String, reason: String },

    /// Step execution failure surfaced by a step body
    #[error("Step '{step}' failed: {reason}")]
    StepFailed { step: String, reason: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Create a step failure error with a message
    pub fn step_failed(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StepFailed {
            step: step.into(),
            reason: reason.into(),
        }
    }
}

/// Definition-time errors. These are always fatal to the construction
/// call that raised them and never occur once execution has started.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// A step name is already registered within the template
    #[error("Step name '{name}' is already registered in template '{template}'")]
    DuplicateStepName { name: String, template: String },

    /// A mutation step was added without a target path
    #[error("No target path has been set for mutation step '{step}'")]
    MissingTarget { step: String },

    /// A condition references a blank attribute name
    #[error("Condition attribute name cannot be blank (step '{step}')")]
    BlankConditionAttribute { step: String },

    /// A step was handed to the engine without template registration
    #[error("Step has not been registered to a template and has no name")]
    UnregisteredStep,

    /// An upgrade step carries a blank version tag
    #[error("Upgrade step version tags cannot be blank (template '{template}')")]
    BlankVersion { template: String },

    /// An upgrade path was built from an empty step chain
    #[error("Upgrade path requires at least one upgrade step")]
    EmptyUpgradePath,

    /// Two adjacent upgrade steps do not share a version boundary
    #[error("Broken upgrade chain: step upgrading to {expected} is followed by step starting at {found}")]
    BrokenUpgradeChain { expected: String, found: String },

    /// The requested upgrade version is the version the application is already at
    #[error("The requested upgrade version ({version}) is the same as the version the application is currently at")]
    CurrentVersionTarget { version: String },

    /// The requested upgrade version precedes the starting version
    #[error("The requested upgrade version ({target}) is older than the version the application is currently at ({current})")]
    OlderTargetVersion { target: String, current: String },

    /// The requested upgrade version is not reachable from the first step
    #[error("The requested upgrade version ({version}) is inexistent")]
    UnknownUpgradeVersion { version: String },
}

/// Transformation context access errors.
///
/// `Collision` is the internal, never-expected category: it indicates an
/// engine invariant violation rather than bad template or application input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    /// The attribute was never recorded in this run
    #[error("Context attribute '{name}' has never been recorded in this run")]
    NeverRecorded { name: String },

    /// The attribute was recorded, but holds a null value
    #[error("Context attribute '{name}' was recorded but holds a null value")]
    NullValue { name: String },

    /// The attribute was recorded, but holds a value of an unexpected type
    #[error("Context attribute '{name}' does not hold a value of the expected type {expected}")]
    WrongType { name: String, expected: &'static str },

    /// An attribute or outcome was written twice under the same name
    #[error("Context entry '{name}' is already bound; entries are write-once")]
    Collision { name: String },
}
