//! Line Match Inspection
//!
//! Publishes whether any line of the target file contains a fragment.
//! Like `FileExists`, this is a condition source: a missing file yields
//! `false` rather than failing, so the result can gate later steps.

use std::path::Path;

use async_trait::async_trait;
use serde_json::json;
use transform_engine::{InspectionResult, Inspector, Result, TransformContext};

/// Check whether any line of the target file contains a fragment
#[derive(Debug, Clone)]
pub struct LineMatch {
    fragment: String,
}

impl LineMatch {
    /// Create a new line match check
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
        }
    }
}

#[async_trait]
impl Inspector for LineMatch {
    fn label(&self) -> &str {
        "LineMatch"
    }

    fn description(&self) -> String {
        format!(
            "Check if any line of the target file contains '{}'",
            self.fragment
        )
    }

    async fn inspect(
        &self,
        target: &Path,
        _context: &TransformContext,
    ) -> Result<InspectionResult> {
        let matched = match tokio::fs::read_to_string(target).await {
            Ok(content) => content
                .lines()
                .any(|line| line.contains(self.fragment.as_str())),
            Err(_) => false,
        };
        log::debug!(
            "LineMatch: '{}' in '{}' -> {}",
            self.fragment,
            target.display(),
            matched
        );
        Ok(InspectionResult::value(json!(matched)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_matches_fragment() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pom.xml");
        std::fs::write(&file, "<packaging>war</packaging>\n").unwrap();

        let context = TransformContext::new();
        let result = LineMatch::new("war").inspect(&file, &context).await.unwrap();
        assert_eq!(result.value_ref(), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_no_match_and_missing_file_are_false() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("pom.xml");
        std::fs::write(&file, "<packaging>jar</packaging>\n").unwrap();

        let context = TransformContext::new();
        let result = LineMatch::new("war").inspect(&file, &context).await.unwrap();
        assert_eq!(result.value_ref(), Some(&json!(false)));

        let missing = LineMatch::new("war")
            .inspect(&dir.path().join("absent"), &context)
            .await
            .unwrap();
        assert_eq!(missing.value_ref(), Some(&json!(false)));
    }
}
