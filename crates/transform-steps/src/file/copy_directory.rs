//! Copy Directory Mutation
//!
//! Recursively copies the target directory tree into a destination
//! directory. Runs the blocking walk on the blocking pool.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use transform_engine::{EngineError, MutationResult, Mutator, Result, TransformContext};

use super::{copy_tree, Destination};

/// Recursively copy the target directory into a destination directory
#[derive(Debug, Clone)]
pub struct CopyDirectory {
    destination: Destination,
}

impl CopyDirectory {
    /// Copy into a directory relative to the source's parent
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
impl Mutator for CopyDirectory {
    fn label(&self) -> &str {
        "CopyDirectory"
    }

    fn description(&self) -> String {
        format!(
            "Copy the target directory tree to {}",
            self.destination.describe()
        )
    }

    async fn mutate(&self, target: &Path, context: &TransformContext) -> Result<MutationResult> {
        if !target.is_dir() {
            return Ok(MutationResult::error(format!(
                "'{}' does not exist or is not a directory",
                target.display()
            )));
        }

        let destination = match self.destination.resolve(target, context) {
            Ok(directory) => directory,
            Err(reason) => return Ok(MutationResult::error(reason)),
        };

        let source = target.to_path_buf();
        let copied_to = destination.clone();
        let copied = tokio::task::spawn_blocking(move || copy_tree(&source, &copied_to))
            .await
            .map_err(|e| EngineError::step_failed("CopyDirectory", e.to_string()))??;

        log::debug!(
            "CopyDirectory: {} files '{}' -> '{}'",
            copied,
            target.display(),
            destination.display()
        );
        Ok(MutationResult::success(format!(
            "copied {} files to '{}'",
            copied,
            destination.display()
        )))
    }
}
