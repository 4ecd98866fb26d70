//! Abort Step
//!
//! Aborts the transformation immediately with a configured message.
//! Designed to sit behind a condition: check a precondition with an
//! inspection, then `execute_unless` the stored result.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

/// Abort the transformation with a message
#[derive(Debug, Clone)]
pub struct AbortStep {
    message: String,
}

impl AbortStep {
    /// Abort with this reason
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Inspector for AbortStep {
    fn label(&self) -> &str {
        "Abort"
    }

    fn description(&self) -> String {
        "Abort the transformation".into()
    }

    async fn inspect(
        &self,
        _target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        log::warn!("Abort: {}", self.message);
        Ok(InspectionResult::error(self.message.clone()))
    }
}
