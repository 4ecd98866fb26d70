//! File Exists Inspection
//!
//! Publishes whether the target file or folder exists as a boolean
//! payload. This is the canonical condition source: store the result
//! under a name and gate later steps with `execute_if`/`execute_unless`.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

/// Check whether the target file or folder exists
#[derive(Debug, Default, Clone)]
pub struct FileExists;

impl FileExists {
    /// Create a new existence check
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Inspector for FileExists {
    fn label(&self) -> &str {
        "FileExists"
    }

    fn description(&self) -> String {
        "Check if the target file or folder exists".into()
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        let exists = target.exists();
        log::debug!("FileExists: '{}' -> {}", target.display(), exists);
        Ok(InspectionResult::value(json!(exists)).with_details(format!(
            "'{}' {}",
            target.display(),
            if exists { "exists" } else { "does not exist" }
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reports_presence() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pom.xml");
        std::fs::write(&file, "<project/>").unwrap();

        let context = TransformContext::new();
        let result = FileExists::new().inspect(&file, &context).await.unwrap();
        assert_eq!(result.value_ref(), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_reports_absence_without_failing() {
        let dir = tempdir().unwrap();
        let context = TransformContext::new();
        let result = FileExists::new()
            .inspect(&dir.path().join("missing.txt"), &context)
            .await
            .unwrap();
        // Absence is a value, not an error
        assert_eq!(result.value_ref(), Some(&json!(false)));
    }
}
