//! Rename File Mutation
//!
//! Renames the target file in place. When the target is already gone but
//! a file with the new name exists, the rename is considered already done
//! and the step reports a no-op, keeping re-runs idempotent.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Rename the target file within its directory
#[derive(Debug, Clone)]
pub struct RenameFile {
    new_name: String,
}

impl RenameFile {
    /// Rename the target to this sibling name
    pub fn new(new_name: impl Into<String>) -> Self {
        Self {
            new_name: new_name.into(),
        }
    }
}

#[async_trait]
impl Mutator for RenameFile {
    fn label(&self) -> &str {
        "RenameFile"
    }

    fn description(&self) -> String {
        format!("Rename the target file to '{}'", self.new_name)
    }

    async fn mutate(&self, target: &Path, _context: &TransformContext) -> Result<MutationResult> {
        let parent = match target.parent() {
            Some(parent) => parent,
            None => {
                return Ok(MutationResult::error(format!(
                    "'{}' has no parent directory",
                    target.display()
                )))
            }
        };
        let renamed = parent.join(&self.new_name);

        if !target.exists() {
            if renamed.exists() {
                return Ok(MutationResult::no_op(format!(
                    "'{}' already renamed to '{}'",
                    target.display(),
                    self.new_name
                )));
            }
            return Ok(MutationResult::error(format!(
                "'{}' does not exist",
                target.display()
            )));
        }

        tokio::fs::rename(target, &renamed).await?;
        log::debug!(
            "RenameFile: '{}' -> '{}'",
            target.display(),
            renamed.display()
        );
        Ok(MutationResult::success(format!(
            "renamed '{}' to '{}'",
            target.display(),
            self.new_name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use transform_engine::MutationKind;

    #[tokio::test]
    async fn test_renames_in_place() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("web.xml");
        std::fs::write(&file, "<web-app/>").unwrap();

        let context = TransformContext::new();
        let result = RenameFile::new("web.xml.bak")
            .mutate(&file, &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Success);
        assert!(!file.exists());
        assert!(dir.path().join("web.xml.bak").exists());
    }

    #[tokio::test]
    async fn test_already_renamed_is_a_no_op() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("web.xml.bak"), "").unwrap();

        let context = TransformContext::new();
        let result = RenameFile::new("web.xml.bak")
            .mutate(&dir.path().join("web.xml"), &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::NoOp);
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let context = TransformContext::new();
        let result = RenameFile::new("new-name")
            .mutate(&dir.path().join("gone.txt"), &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Error);
    }
}
