//! Transform Engine - Template-driven codebase transformation for remodel
//!
//! This crate provides the execution core for declarative, repeatable
//! codebase migrations. A transformation is a template: an ordered,
//! possibly grouped, list of steps executed sequentially against an
//! isolated working copy of an application tree. It supports:
//!
//! - Inspection steps (read-only, publish values) and mutation steps
//!   (write, carry per-step abort policies)
//! - A write-once execution context threading results between steps
//! - Conditional execution (`execute_if`/`execute_unless`) against
//!   context attributes
//! - Version-to-version upgrade paths chaining templates
//! - Progress events through a pluggable sink
//!
//! # Architecture
//!
//! Step definitions are immutable and shared across runs; all per-run
//! state lives in the [`TransformContext`], so many transformations can
//! run concurrently without locking as long as each owns its working
//! tree. Within one run, steps are strictly sequential.
//!
//! # Example
//!
//! ```ignore
//! use transform_engine::{Engine, ExecutionOptions, Step, Template, TransformContext};
//!
//! let mut template = Template::new("SpringBootMigration", "WAR to Spring Boot");
//! let has_pom = template.add(Step::inspect(FileExists::new()).relative("pom.xml"))?;
//! template.add(Step::mutate(ReplaceText::new("war", "jar")).relative("pom.xml").execute_if(&has_pom))?;
//!
//! let mut context = TransformContext::new();
//! let report = Engine::new()
//!     .execute(&template, working_copy, &mut context, &ExecutionOptions::default())
//!     .await?;
//! ```

pub mod context;
pub mod engine;
pub mod error;
pub mod events;
pub mod result;
pub mod step;
pub mod template;
pub mod upgrade;

// Re-export key types
pub use context::TransformContext;
pub use engine::{AbortDetails, Engine, ExecutionOptions, ExecutionReport};
pub use error::{ContextError, DefinitionError, EngineError, Result};
pub use events::{EventSink, LogEventSink, TransformEvent};
pub use result::{
    ExecutionResult, InspectionKind, InspectionResult, ManualInstructionRecord, MutationKind,
    MutationResult, StepOutcome,
};
pub use step::{Condition, Inspector, Mutator, Step, StepBody, TargetSpec};
pub use template::Template;
pub use upgrade::{compare_versions, UpgradeOutcome, UpgradePath, UpgradeRunRecord, UpgradeStep};
