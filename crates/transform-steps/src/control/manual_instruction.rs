//! Manual Instruction Step
//!
//! Records an instruction for a change that cannot be fully automated.
//! The record rides on the step's no-op result into the context; the
//! service layer renders all recorded instructions into a document next
//! to the transformed tree.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use transform_engine::{
    InspectionResult, Inspector, ManualInstructionRecord, Result, TransformContext,
};

/// Record a manual post-transformation instruction
#[derive(Debug, Clone)]
pub struct ManualInstruction {
    description: String,
    resource: Option<PathBuf>,
}

impl ManualInstruction {
    /// Record an instruction with this description
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            resource: None,
        }
    }

    /// Point the instruction at a path within the transformed tree
    pub fn with_resource(mut self, resource: impl Into<PathBuf>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

#[async_trait]
impl Inspector for ManualInstruction {
    fn label(&self) -> &str {
        "ManualInstruction"
    }

    fn description(&self) -> String {
        format!("Record manual instruction: {}", self.description)
    }

    async fn inspect(
        &self,
        _target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        log::info!("Manual instruction recorded: {}", self.description);
        Ok(
            InspectionResult::no_op("manual instruction recorded").with_manual_instruction(
                ManualInstructionRecord {
                    description: self.description.clone(),
                    resource: self.resource.clone(),
                },
            ),
        )
    }
}
