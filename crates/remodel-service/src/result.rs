//! Transformation result model
//!
//! The single source of truth a caller gets back: where the transformed
//! tree is, whether the run succeeded or aborted, every step outcome in
//! order, and the locations of optional artifacts. Plain serde data, so
//! downstream consumers (persistence, notifiers) only ever need read
//! access.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use transform_engine::{AbortDetails, StepOutcome};

use crate::config::Configuration;

/// One recorded step of the run, in execution order
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepRecord {
    pub step: String,
    pub outcome: StepOutcome,
}

/// Version boundaries of an upgrade run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeSummary {
    pub from_version: String,
    pub to_version: String,
}

/// Final report of one transformation request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationResult {
    /// Run identifier
    pub id: String,
    /// Name of the executed template (first step's template for upgrades)
    pub template: String,
    /// Version boundaries, for upgrade runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeSummary>,
    /// The configuration the request ran with
    pub configuration: Configuration,
    /// Where the transformed tree (or zip) ended up
    pub transformed_location: PathBuf,
    /// Whether the run completed without aborting
    pub successful: bool,
    /// Whether the run was cut short by a fatal step outcome
    pub aborted: bool,
    /// The triggering step, when aborted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_details: Option<AbortDetails>,
    /// Ordered per-step outcomes across the whole run
    pub step_outcomes: Vec<StepRecord>,
    /// Whether any step recorded a manual instruction
    pub manual_instructions_available: bool,
    /// The rendered manual-instructions document, when available. For
    /// zipped output this points at the archive; the document sits at the
    /// archive root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_instructions_location: Option<PathBuf>,
    /// The zipped output, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_location: Option<PathBuf>,
    /// When the run finished
    pub timestamp: DateTime<Utc>,
}

impl TransformationResult {
    /// Outcome lookup by step name
    pub fn outcome(&self, step: &str) -> Option<&StepOutcome> {
        self.step_outcomes
            .iter()
            .find(|record| record.step == step)
            .map(|record| &record.outcome)
    }
}
