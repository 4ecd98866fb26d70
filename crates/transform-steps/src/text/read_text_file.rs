//! Read Text File Inspection
//!
//! Loads the target file's text as the step's payload. A missing or
//! unreadable file is an error: steps downstream of this one depend on
//! the content being there.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

/// Read the target file into a string payload
#[derive(Debug, Default, Clone)]
pub struct ReadTextFile;

impl ReadTextFile {
    /// Create a new file read
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Inspector for ReadTextFile {
    fn label(&self) -> &str {
        "ReadTextFile"
    }

    fn description(&self) -> String {
        "Read the target file as text".into()
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        match tokio::fs::read_to_string(target).await {
            Ok(content) => {
                log::debug!(
                    "ReadTextFile: {} bytes from '{}'",
                    content.len(),
                    target.display()
                );
                let length = content.len();
                Ok(InspectionResult::value(json!(content))
                    .with_details(format!("{} bytes read", length)))
            }
            Err(e) => Ok(InspectionResult::error(format!(
                "could not read '{}': {}",
                target.display(),
                e
            ))),
        }
    }
}
