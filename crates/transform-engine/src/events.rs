//! Event types for streaming transformation progress
//!
//! Events are sent from the engine to any consumer (a CLI spinner, a
//! notification hook, test assertions) to report step-by-step progress.
//! The default sink forwards everything to the `log` facade.

use serde::Serialize;

/// Trait for receiving transformation events
///
/// Sinks are shared across concurrent runs, so implementations must be
/// `Send + Sync` and interior-mutable if they accumulate state.
pub trait EventSink: Send + Sync {
    /// Receive an event
    fn send(&self, event: TransformEvent);
}

/// Events emitted during template execution
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransformEvent {
    /// Template execution started
    #[serde(rename_all = "camelCase")]
    TemplateStarted { template: String, steps: usize },

    /// A step is about to execute
    #[serde(rename_all = "camelCase")]
    StepStarted { step: String, description: String },

    /// A step finished (executed, skipped or failed)
    #[serde(rename_all = "camelCase")]
    StepCompleted {
        step: String,
        outcome: String,
        details: Option<String>,
    },

    /// Template execution finished without aborting
    #[serde(rename_all = "camelCase")]
    TemplateCompleted { template: String, executed: usize },

    /// Template execution aborted at a step
    #[serde(rename_all = "camelCase")]
    TemplateAborted {
        template: String,
        step: String,
        error: String,
    },

    /// An upgrade-path step is about to run its template
    #[serde(rename_all = "camelCase")]
    UpgradeStepStarted {
        template: String,
        from_version: String,
        to_version: String,
    },
}

/// Default sink forwarding events to the `log` facade
#[derive(Debug, Default)]
pub struct LogEventSink;

impl EventSink for LogEventSink {
    fn send(&self, event: TransformEvent) {
        match &event {
            TransformEvent::TemplateStarted { template, steps } => {
                log::info!("Executing template '{}' ({} steps)", template, steps);
            }
            TransformEvent::StepStarted { step, description } => {
                log::debug!("{}: {}", step, description);
            }
            TransformEvent::StepCompleted {
                step,
                outcome,
                details,
            } => {
                log::debug!("{}: {} {}", step, outcome, details.as_deref().unwrap_or(""));
            }
            TransformEvent::TemplateCompleted { template, executed } => {
                log::info!("Template '{}' completed, {} steps executed", template, executed);
            }
            TransformEvent::TemplateAborted {
                template,
                step,
                error,
            } => {
                log::error!("Template '{}' aborted at step {}: {}", template, step, error);
            }
            TransformEvent::UpgradeStepStarted {
                template,
                from_version,
                to_version,
            } => {
                log::info!(
                    "Upgrade step '{}': {} -> {}",
                    template,
                    from_version,
                    to_version
                );
            }
        }
    }
}
