//! Typed step outcomes
//!
//! Inspection and mutation steps carry parallel result taxonomies because
//! their failure blast-radius differs: a failed inspection leaves the rest
//! of the template without a value it likely depends on, while a failed
//! mutation may be tolerable if the step opted out of aborting.
//!
//! Warnings are cumulative and can be attached after the primary kind was
//! decided (a resource-close failure discovered during cleanup, for
//! example). They promote a successful kind to `Warning` but never demote
//! an `Error`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One entry of the manual-instructions artifact, recorded by a step that
/// cannot fully automate its change. The engine moves these into the
/// context as outcomes are recorded; the service layer renders them into
/// a document at the end of the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualInstructionRecord {
    /// What the operator has to do by hand
    pub description: String,
    /// Path (relative to the transformed tree) the instruction refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<PathBuf>,
}

/// Result kind of an inspection step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InspectionKind {
    /// The inspection produced a usable payload
    Value,
    /// Nothing to report; not an error
    NoOp,
    /// A payload may have been produced, with a non-fatal caveat
    Warning,
    /// No usable payload; always aborts the run
    Error,
}

/// Result kind of a mutation step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    /// The change was applied
    Success,
    /// Nothing needed changing; not an error
    NoOp,
    /// The change was applied, with a non-fatal caveat
    Warning,
    /// The change was not applied; aborts only if the step is configured to
    Error,
}

/// Outcome of one inspection step execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResult {
    kind: InspectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_instruction: Option<ManualInstructionRecord>,
}

impl InspectionResult {
    /// A `Value` result. The payload is saved into the transformation
    /// context under the step's storage name after the step completes.
    pub fn value(value: serde_json::Value) -> Self {
        Self {
            kind: InspectionKind::Value,
            details: None,
            value: Some(value),
            error: None,
            warnings: Vec::new(),
            manual_instruction: None,
        }
    }

    /// A `NoOp` result, for inspections defined to never fail but
    /// sometimes have nothing to report
    pub fn no_op(details: impl Into<String>) -> Self {
        Self {
            kind: InspectionKind::NoOp,
            details: Some(details.into()),
            value: None,
            error: None,
            warnings: Vec::new(),
            manual_instruction: None,
        }
    }

    /// An `Error` result. Inspection errors always abort the run.
    pub fn error(error: impl std::fmt::Display) -> Self {
        Self {
            kind: InspectionKind::Error,
            details: None,
            value: None,
            error: Some(error.to_string()),
            warnings: Vec::new(),
            manual_instruction: None,
        }
    }

    /// Attach a detail message
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach a non-fatal warning, promoting `Value`/`NoOp` to `Warning`
    pub fn add_warning(&mut self, warning: impl std::fmt::Display) {
        self.warnings.push(warning.to_string());
        if matches!(self.kind, InspectionKind::Value | InspectionKind::NoOp) {
            self.kind = InspectionKind::Warning;
        }
    }

    /// Attach a manual-instructions entry. The engine registers it with
    /// the context when the outcome is recorded.
    pub fn with_manual_instruction(mut self, record: ManualInstructionRecord) -> Self {
        self.manual_instruction = Some(record);
        self
    }

    pub fn manual_instruction(&self) -> Option<&ManualInstructionRecord> {
        self.manual_instruction.as_ref()
    }

    pub fn kind(&self) -> InspectionKind {
        self.kind
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn value_ref(&self) -> Option<&serde_json::Value> {
        self.value.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Outcome of one mutation step execution
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    kind: MutationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl MutationResult {
    /// A `Success` result
    pub fn success(details: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Success,
            details: Some(details.into()),
            error: None,
            warnings: Vec::new(),
        }
    }

    /// A `NoOp` result: nothing needed changing
    pub fn no_op(details: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::NoOp,
            details: Some(details.into()),
            error: None,
            warnings: Vec::new(),
        }
    }

    /// An `Error` result: the change was not applied
    pub fn error(error: impl std::fmt::Display) -> Self {
        Self {
            kind: MutationKind::Error,
            details: None,
            error: Some(error.to_string()),
            warnings: Vec::new(),
        }
    }

    /// Attach a detail message
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach a non-fatal warning, promoting `Success`/`NoOp` to `Warning`
    pub fn add_warning(&mut self, warning: impl std::fmt::Display) {
        self.warnings.push(warning.to_string());
        if matches!(self.kind, MutationKind::Success | MutationKind::NoOp) {
            self.kind = MutationKind::Warning;
        }
    }

    pub fn kind(&self) -> MutationKind {
        self.kind
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Union of the two execution result families
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "stepKind", rename_all = "camelCase")]
pub enum ExecutionResult {
    Inspection(InspectionResult),
    Mutation(MutationResult),
}

impl ExecutionResult {
    /// Whether this is a fatal result for its step family
    pub fn is_error(&self) -> bool {
        match self {
            Self::Inspection(r) => r.kind() == InspectionKind::Error,
            Self::Mutation(r) => r.kind() == MutationKind::Error,
        }
    }

    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Inspection(r) => r.details(),
            Self::Mutation(r) => r.details(),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Inspection(r) => r.error_message(),
            Self::Mutation(r) => r.error_message(),
        }
    }

    /// The inspection payload, if any
    pub fn value_ref(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Inspection(r) => r.value_ref(),
            Self::Mutation(_) => None,
        }
    }

    /// A short kind tag for logs and events
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Inspection(r) => match r.kind() {
                InspectionKind::Value => "value",
                InspectionKind::NoOp => "noOp",
                InspectionKind::Warning => "warning",
                InspectionKind::Error => "error",
            },
            Self::Mutation(r) => match r.kind() {
                MutationKind::Success => "success",
                MutationKind::NoOp => "noOp",
                MutationKind::Warning => "warning",
                MutationKind::Error => "error",
            },
        }
    }
}

/// What the engine recorded for one step of the template walk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum StepOutcome {
    /// The step body ran and produced an execution result
    #[serde(rename_all = "camelCase")]
    Executed { result: ExecutionResult },

    /// The step's condition resolved to false; the body never ran
    #[serde(rename_all = "camelCase")]
    SkippedCondition { details: String },

    /// The step failed before its body could run, e.g. its target path
    /// could not be resolved from the context
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl StepOutcome {
    /// Whether the outcome is fatal for its step family
    pub fn is_error(&self) -> bool {
        match self {
            Self::Executed { result } => result.is_error(),
            Self::SkippedCondition { .. } => false,
            Self::Error { .. } => true,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::SkippedCondition { .. })
    }

    pub fn execution_result(&self) -> Option<&ExecutionResult> {
        match self {
            Self::Executed { result } => Some(result),
            _ => None,
        }
    }

    /// The error message carried by this outcome, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Executed { result } => result.error_message(),
            Self::SkippedCondition { .. } => None,
            Self::Error { error, .. } => Some(error),
        }
    }
}
