//! Sequential template execution
//!
//! The engine walks a template's step list in registration order, resolves
//! each step's effective target path and condition against the context,
//! executes the step body, records the outcome, and applies the abort
//! policy. Steps never execute concurrently within one run; later steps
//! routinely consume context values written by earlier ones.
//!
//! Failure semantics are strictly sequential and deterministic: the same
//! starting tree and template produce the same sequence of recorded
//! outcomes.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::TransformContext;
use crate::error::{DefinitionError, EngineError, Result};
use crate::events::{EventSink, LogEventSink, TransformEvent};
use crate::result::{ExecutionResult, InspectionResult, MutationResult, StepOutcome};
use crate::step::{Step, StepBody, TargetSpec};
use crate::template::Template;
use crate::upgrade::{UpgradeOutcome, UpgradePath, UpgradeRunRecord};

/// Per-run execution switches
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Execute the template but never invoke mutators; mutation steps are
    /// recorded as no-ops so the run stays diagnosable
    pub dry_run: bool,
    /// Log every step at info level instead of debug
    pub verbose: bool,
}

/// The step that triggered an abort, and why
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortDetails {
    pub step: String,
    pub error: String,
}

/// Summary of one template execution. The ordered per-step outcomes live
/// in the run's context.
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    /// Whether the run was cut short by a fatal step outcome
    pub aborted: bool,
    /// The triggering step, when aborted
    pub abort_details: Option<AbortDetails>,
    /// Number of outcomes recorded by this execution (skip markers
    /// included)
    pub executed: usize,
}

/// Walks templates and upgrade paths against a working tree
pub struct Engine {
    events: Arc<dyn EventSink>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Create an engine that reports progress through the `log` facade
    pub fn new() -> Self {
        Self {
            events: Arc::new(LogEventSink),
        }
    }

    /// Create an engine with a custom event sink
    pub fn with_event_sink(events: Arc<dyn EventSink>) -> Self {
        Self { events }
    }

    /// Execute a template against the working tree rooted at `root`,
    /// recording every outcome into `context`.
    ///
    /// `Err` is reserved for engine invariant violations (for example a
    /// context write collision); template- and application-level failures
    /// are reported through the returned [`ExecutionReport`] instead.
    pub async fn execute(
        &self,
        template: &Template,
        root: &Path,
        context: &mut TransformContext,
        options: &ExecutionOptions,
    ) -> Result<ExecutionReport> {
        self.events.send(TransformEvent::TemplateStarted {
            template: template.name().to_string(),
            steps: template.len(),
        });

        let before = context.outcomes().len();
        let abort = self
            .run_steps(template.steps(), root, context, options)
            .await?;
        let executed = context.outcomes().len() - before;

        match abort {
            Some(details) => {
                self.events.send(TransformEvent::TemplateAborted {
                    template: template.name().to_string(),
                    step: details.step.clone(),
                    error: details.error.clone(),
                });
                Ok(ExecutionReport {
                    aborted: true,
                    abort_details: Some(details),
                    executed,
                })
            }
            None => {
                self.events.send(TransformEvent::TemplateCompleted {
                    template: template.name().to_string(),
                    executed,
                });
                Ok(ExecutionReport {
                    aborted: false,
                    abort_details: None,
                    executed,
                })
            }
        }
    }

    /// Walk an upgrade path, executing each yielded step's template fully
    /// (with a fresh context seeded from `properties`) before advancing.
    /// An aborted template stops the walk; the path does not advance past
    /// it.
    pub async fn execute_upgrade(
        &self,
        path: &mut UpgradePath,
        root: &Path,
        properties: &HashMap<String, String>,
        options: &ExecutionOptions,
    ) -> Result<UpgradeOutcome> {
        let mut runs = Vec::new();
        let mut abort_details = None;

        while path.has_next() {
            let step = match path.next() {
                Some(step) => step,
                None => break,
            };
            self.events.send(TransformEvent::UpgradeStepStarted {
                template: step.template().name().to_string(),
                from_version: step.current_version().to_string(),
                to_version: step.next_version().to_string(),
            });

            let mut context = TransformContext::with_properties(properties);
            let report = self
                .execute(step.template(), root, &mut context, options)
                .await?;

            let aborted = report.aborted;
            runs.push(UpgradeRunRecord {
                template: step.template().name().to_string(),
                from_version: step.current_version().to_string(),
                to_version: step.next_version().to_string(),
                aborted,
                abort_details: report.abort_details.clone(),
                outcomes: context.outcomes().to_vec(),
                manual_instructions: context.manual_instructions().to_vec(),
            });

            if aborted {
                abort_details = report.abort_details;
                break;
            }
        }

        Ok(UpgradeOutcome {
            aborted: abort_details.is_some(),
            abort_details,
            runs,
        })
    }

    fn run_steps<'a>(
        &'a self,
        steps: &'a [Step],
        root: &'a Path,
        context: &'a mut TransformContext,
        options: &'a ExecutionOptions,
    ) -> Pin<Box<dyn Future<Output = Result<Option<AbortDetails>>> + Send + 'a>> {
        Box::pin(async move {
            for step in steps {
                if let Some(abort) = self.run_step(step, root, context, options).await? {
                    return Ok(Some(abort));
                }
            }
            Ok(None)
        })
    }

    async fn run_step(
        &self,
        step: &Step,
        root: &Path,
        context: &mut TransformContext,
        options: &ExecutionOptions,
    ) -> Result<Option<AbortDetails>> {
        let name = step
            .name()
            .ok_or(DefinitionError::UnregisteredStep)?
            .to_string();

        // Groups: the condition is evaluated once; a false condition skips
        // every child without individual evaluation
        if let StepBody::Group(children) = &step.body {
            if let Some(condition) = step.condition() {
                if !condition.holds(context) {
                    return self.record_skip(&name, condition.describe(), context);
                }
            }
            return self.run_steps(children, root, context, options).await;
        }

        if let Some(condition) = step.condition() {
            if !condition.holds(context) {
                return self.record_skip(&name, condition.describe(), context);
            }
        }

        if options.verbose {
            log::info!("{}: {}", name, step.description());
        }
        self.events.send(TransformEvent::StepStarted {
            step: name.clone(),
            description: step.description(),
        });

        let target = match self.resolve_target(&name, step, root, context) {
            Ok(target) => target,
            Err(e) => {
                let reason = e.to_string();
                let abort = match &step.body {
                    StepBody::Mutation {
                        abort_on_failure, ..
                    } => *abort_on_failure,
                    // Inspection resolution failures always abort
                    _ => true,
                };
                context.record_outcome(
                    &name,
                    StepOutcome::Error {
                        error: reason.clone(),
                        details: Some("target path resolution failed".into()),
                    },
                    None,
                )?;
                self.events.send(TransformEvent::StepCompleted {
                    step: name.clone(),
                    outcome: "error".into(),
                    details: Some(reason.clone()),
                });
                if abort {
                    return Ok(Some(AbortDetails {
                        step: name,
                        error: reason,
                    }));
                }
                return Ok(None);
            }
        };

        let (result, abort_on_error) = match &step.body {
            StepBody::Inspection(inspector) => {
                let result = match inspector.inspect(&target, context).await {
                    Ok(result) => result,
                    Err(e) => InspectionResult::error(e),
                };
                (ExecutionResult::Inspection(result), true)
            }
            StepBody::Mutation {
                mutator,
                abort_on_failure,
            } => {
                let result = if options.dry_run {
                    MutationResult::no_op("dry run: mutation not applied")
                } else {
                    match mutator.mutate(&target, context).await {
                        Ok(result) => result,
                        Err(e) => MutationResult::error(e),
                    }
                };
                (ExecutionResult::Mutation(result), *abort_on_failure)
            }
            // Groups were handled above
            StepBody::Group(_) => return Ok(None),
        };

        let is_error = result.is_error();
        let error = result.error_message().map(str::to_string);
        let outcome_label = result.kind_label().to_string();
        let details = result.details().map(str::to_string);

        context.record_outcome(
            &name,
            StepOutcome::Executed { result },
            step.store_as.as_deref(),
        )?;
        self.events.send(TransformEvent::StepCompleted {
            step: name.clone(),
            outcome: outcome_label,
            details,
        });

        if is_error && abort_on_error {
            return Ok(Some(AbortDetails {
                step: name,
                error: error.unwrap_or_else(|| "step failed".into()),
            }));
        }
        Ok(None)
    }

    fn record_skip(
        &self,
        name: &str,
        condition: String,
        context: &mut TransformContext,
    ) -> Result<Option<AbortDetails>> {
        let details = format!("skipped, condition {} was false", condition);
        context.record_outcome(
            name,
            StepOutcome::SkippedCondition {
                details: details.clone(),
            },
            None,
        )?;
        self.events.send(TransformEvent::StepCompleted {
            step: name.to_string(),
            outcome: "skipped".into(),
            details: Some(details),
        });
        Ok(None)
    }

    /// Resolve the step's effective path: context-driven targets are read
    /// now, then "parent levels" traversal is applied
    fn resolve_target(
        &self,
        name: &str,
        step: &Step,
        root: &Path,
        context: &TransformContext,
    ) -> Result<PathBuf> {
        let resolution_error = |reason: String| EngineError::TargetResolution {
            step: name.to_string(),
            reason,
        };

        let base = match step.target() {
            Some(TargetSpec::Relative(path)) => root.join(path),
            Some(TargetSpec::Absolute(path)) => path.clone(),
            Some(TargetSpec::FromAttribute { attribute, join }) => {
                let raw: String = context
                    .get::<String>(attribute)
                    .map_err(|e| resolution_error(e.to_string()))?;
                let mut path = PathBuf::from(raw);
                if let Some(join) = join {
                    path = path.join(join);
                }
                path
            }
            // Registration guarantees mutation steps carry a target;
            // anything else falls back to the application root
            None => root.to_path_buf(),
        };

        let mut path = base;
        for _ in 0..step.parent_levels {
            path = path
                .parent()
                .ok_or_else(|| {
                    resolution_error(format!("no parent directory above '{}'", path.display()))
                })?
                .to_path_buf();
        }
        Ok(path)
    }
}
