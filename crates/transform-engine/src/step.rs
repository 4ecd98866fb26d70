//! Step contract
//!
//! A step is a single unit of work against the target tree: an inspection
//! (read-only, returns a value) or a mutation (writes, returns no value).
//! Step definitions are immutable once registered to a template and are
//! shared across concurrent runs behind `Arc`; all per-run state lives in
//! the engine and the context, never in the step itself.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::TransformContext;
use crate::error::Result;
use crate::result::{InspectionResult, MutationResult};

/// A read-only step. Inspectors gather information about the tree and
/// publish it through the context; they must not modify the tree.
#[async_trait]
pub trait Inspector: Send + Sync {
    /// Short type label used when deriving step names, e.g. `FileExists`
    fn label(&self) -> &str;

    /// One-line, specific description mentioning the configured target
    fn description(&self) -> String;

    /// Execute against the resolved target path.
    ///
    /// An `Err` escaping this body is folded into an
    /// [`InspectionResult::error`] by the engine, which then aborts the run.
    async fn inspect(&self, target: &Path, context: &TransformContext)
        -> Result<InspectionResult>;
}

/// A write step. Mutators apply one idempotent change to the tree.
#[async_trait]
pub trait Mutator: Send + Sync {
    /// Short type label used when deriving step names, e.g. `ReplaceText`
    fn label(&self) -> &str;

    /// One-line, specific description mentioning the configured target
    fn description(&self) -> String;

    /// Whether a failure of this mutator aborts the run by default.
    /// Each mutator declares its own default; the step builder can
    /// override it per registration.
    fn abort_on_failure_default(&self) -> bool {
        true
    }

    /// Execute against the resolved target path.
    ///
    /// An `Err` escaping this body is folded into a
    /// [`MutationResult::error`] by the engine.
    async fn mutate(&self, target: &Path, context: &TransformContext) -> Result<MutationResult>;
}

/// How a step's effective target path is derived at execution time
#[derive(Debug, Clone)]
pub enum TargetSpec {
    /// Path relative to the application root. `"."` targets the root itself.
    Relative(PathBuf),
    /// Absolute path, independent of the application root
    Absolute(PathBuf),
    /// Path read from a context attribute at execution time, optionally
    /// joined with an additional relative path known at definition time
    FromAttribute {
        attribute: String,
        join: Option<PathBuf>,
    },
}

/// Execution condition referencing a context attribute by name.
///
/// Resolution uses [`TransformContext::flag`] coercion: a missing or null
/// attribute counts as false (the step is skipped, it does not fail).
#[derive(Debug, Clone)]
pub struct Condition {
    pub(crate) attribute: String,
    pub(crate) negated: bool,
}

impl Condition {
    /// Whether the condition holds against the given context
    pub fn holds(&self, context: &TransformContext) -> bool {
        context.flag(&self.attribute) != self.negated
    }

    /// The referenced attribute name
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Human-readable form for skip markers and logs
    pub fn describe(&self) -> String {
        if self.negated {
            format!("unless '{}'", self.attribute)
        } else {
            format!("if '{}'", self.attribute)
        }
    }
}

/// The executable body of a step
pub enum StepBody {
    /// Read-only inspection
    Inspection(Arc<dyn Inspector>),
    /// Tree mutation with its abort policy
    Mutation {
        mutator: Arc<dyn Mutator>,
        abort_on_failure: bool,
    },
    /// Named group of steps sharing a single group-level condition
    Group(Vec<Step>),
}

impl std::fmt::Debug for StepBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inspection(i) => f.debug_tuple("Inspection").field(&i.label()).finish(),
            Self::Mutation {
                mutator,
                abort_on_failure,
            } => f
                .debug_struct("Mutation")
                .field("mutator", &mutator.label())
                .field("abort_on_failure", abort_on_failure)
                .finish(),
            Self::Group(steps) => f.debug_tuple("Group").field(&steps.len()).finish(),
        }
    }
}

/// One registered unit of a template: body plus target, condition and
/// naming attributes
#[derive(Debug)]
pub struct Step {
    pub(crate) name: Option<String>,
    pub(crate) target: Option<TargetSpec>,
    pub(crate) parent_levels: u32,
    pub(crate) condition: Option<Condition>,
    pub(crate) store_as: Option<String>,
    pub(crate) body: StepBody,
}

impl Step {
    /// Wrap an inspector. The target defaults to the application root.
    pub fn inspect(inspector: impl Inspector + 'static) -> Self {
        Self {
            name: None,
            target: Some(TargetSpec::Relative(PathBuf::from("."))),
            parent_levels: 0,
            condition: None,
            store_as: None,
            body: StepBody::Inspection(Arc::new(inspector)),
        }
    }

    /// Wrap a mutator. Mutation steps have no default target: one must be
    /// set explicitly before the step can be registered to a template.
    pub fn mutate(mutator: impl Mutator + 'static) -> Self {
        let abort_on_failure = mutator.abort_on_failure_default();
        Self {
            name: None,
            target: None,
            parent_levels: 0,
            condition: None,
            store_as: None,
            body: StepBody::Mutation {
                mutator: Arc::new(mutator),
                abort_on_failure,
            },
        }
    }

    /// Build a named group of steps. The group's own condition (set via
    /// [`Step::execute_if`]/[`Step::execute_unless`]) is evaluated once
    /// for all children.
    pub fn group(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: Some(name.into()),
            target: None,
            parent_levels: 0,
            condition: None,
            store_as: None,
            body: StepBody::Group(steps),
        }
    }

    /// Set an explicit step name instead of the derived one
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Target a path relative to the application root
    pub fn relative(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(TargetSpec::Relative(path.into()));
        self
    }

    /// Target an absolute path
    pub fn absolute(mut self, path: impl Into<PathBuf>) -> Self {
        self.target = Some(TargetSpec::Absolute(path.into()));
        self
    }

    /// Target the path held by a context attribute, resolved at execution
    /// time
    pub fn from_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.target = Some(TargetSpec::FromAttribute {
            attribute: attribute.into(),
            join: None,
        });
        self
    }

    /// Target the path held by a context attribute, joined with an
    /// additional relative path known now
    pub fn from_attribute_joined(
        mut self,
        attribute: impl Into<String>,
        join: impl Into<PathBuf>,
    ) -> Self {
        self.target = Some(TargetSpec::FromAttribute {
            attribute: attribute.into(),
            join: Some(join.into()),
        });
        self
    }

    /// Walk up this many parent directories after resolving the target
    pub fn parent_levels(mut self, levels: u32) -> Self {
        self.parent_levels = levels;
        self
    }

    /// Execute only if the named context attribute is truthy
    pub fn execute_if(mut self, attribute: impl Into<String>) -> Self {
        self.condition = Some(Condition {
            attribute: attribute.into(),
            negated: false,
        });
        self
    }

    /// Execute only if the named context attribute is falsy
    pub fn execute_unless(mut self, attribute: impl Into<String>) -> Self {
        self.condition = Some(Condition {
            attribute: attribute.into(),
            negated: true,
        });
        self
    }

    /// Store the inspection payload under this attribute name instead of
    /// the step name
    pub fn store_as(mut self, attribute: impl Into<String>) -> Self {
        self.store_as = Some(attribute.into());
        self
    }

    /// Override the mutator's declared abort-on-failure default.
    /// Has no effect on inspection steps, whose errors always abort.
    pub fn abort_on_failure(mut self, abort: bool) -> Self {
        if let StepBody::Mutation {
            abort_on_failure, ..
        } = &mut self.body
        {
            *abort_on_failure = abort;
        }
        self
    }

    /// The registered name, once assigned by a template
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Short type label of the body, used when deriving step names
    pub fn label(&self) -> &str {
        match &self.body {
            StepBody::Inspection(inspector) => inspector.label(),
            StepBody::Mutation { mutator, .. } => mutator.label(),
            StepBody::Group(_) => "Group",
        }
    }

    /// One-line description of the body
    pub fn description(&self) -> String {
        match &self.body {
            StepBody::Inspection(inspector) => inspector.description(),
            StepBody::Mutation { mutator, .. } => mutator.description(),
            StepBody::Group(steps) => format!("Group of {} steps", steps.len()),
        }
    }

    pub fn target(&self) -> Option<&TargetSpec> {
        self.target.as_ref()
    }

    pub fn condition(&self) -> Option<&Condition> {
        self.condition.as_ref()
    }
}
