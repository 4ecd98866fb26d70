//! Copy File Mutation
//!
//! Copies the target file into a destination directory, creating it if
//! needed. Existing files at the destination are overwritten, so the step
//! is idempotent. A missing source is an error: a template that copies a
//! file it is not sure exists should gate the step on a `FileExists`
//! condition instead.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

use super::Destination;

/// Copy the target file into a destination directory
#[derive(Debug, Clone)]
pub struct CopyFile {
    destination: Destination,
}

impl CopyFile {
    /// Copy into a directory relative to the source file's parent
    pub fn to_sibling(path: impl Into<PathBuf>) -> Self {
        Self {
            destination: Destination::Sibling(path.into()),
        }
    }

    /// Copy into the absolute directory held by a context attribute
    pub fn to_attribute(attribute: impl Into<String>) -> Self {
        Self {
            destination: Destination::FromAttribute(attribute.into()),
        }
    }
}

#[async_trait]
impl Mutator for CopyFile {
    fn label(&self) -> &str {
        "CopyFile"
    }

    fn description(&self) -> String {
        format!("Copy the target file to {}", self.destination.describe())
    }

    async fn mutate(&self, target: &Path, context: &TransformContext) -> Result<MutationResult> {
        if !target.is_file() {
            return Ok(MutationResult::error(format!(
                "'{}' does not exist or is not a file",
                target.display()
            )));
        }

        let directory = match self.destination.resolve(target, context) {
            Ok(directory) => directory,
            Err(reason) => return Ok(MutationResult::error(reason)),
        };
        let file_name = match target.file_name() {
            Some(name) => name.to_owned(),
            None => {
                return Ok(MutationResult::error(format!(
                    "'{}' has no file name",
                    target.display()
                )))
            }
        };

        tokio::fs::create_dir_all(&directory).await?;
        let destination = directory.join(file_name);
        tokio::fs::copy(target, &destination).await?;
        log::debug!(
            "CopyFile: '{}' -> '{}'",
            target.display(),
            destination.display()
        );
        Ok(MutationResult::success(format!(
            "copied '{}' to '{}'",
            target.display(),
            destination.display()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;
    use transform_engine::MutationKind;

    #[tokio::test]
    async fn test_copies_into_sibling_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("app.properties");
        std::fs::write(&source, "a=1\n").unwrap();

        let context = TransformContext::new();
        let result = CopyFile::to_sibling("config")
            .mutate(&source, &context)
            .await
            .unwrap();

        assert_eq!(result.kind(), MutationKind::Success);
        let copied = dir.path().join("config/app.properties");
        assert_eq!(std::fs::read_to_string(copied).unwrap(), "a=1\n");
    }

    #[tokio::test]
    async fn test_copies_into_attribute_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("notes.txt");
        std::fs::write(&source, "text").unwrap();
        let destination = dir.path().join("elsewhere");

        let mut context = TransformContext::new();
        context
            .set_value("destDir", json!(destination.to_string_lossy()))
            .unwrap();

        let result = CopyFile::to_attribute("destDir")
            .mutate(&source, &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Success);
        assert!(destination.join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_source_is_an_error() {
        let dir = tempdir().unwrap();
        let context = TransformContext::new();
        let result = CopyFile::to_sibling("out")
            .mutate(&dir.path().join("gone.txt"), &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Error);
    }

    #[tokio::test]
    async fn test_missing_destination_attribute_is_an_error() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("f.txt");
        std::fs::write(&source, "").unwrap();

        let context = TransformContext::new();
        let result = CopyFile::to_attribute("unset")
            .mutate(&source, &context)
            .await
            .unwrap();
        assert_eq!(result.kind(), MutationKind::Error);
    }
}
