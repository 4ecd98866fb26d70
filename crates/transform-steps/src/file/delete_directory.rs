//! Delete Directory Mutation
//!
//! Removes the target directory tree. An absent target is a no-op, and a
//! failed deletion does not abort the run by default.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Delete the target directory and everything under it
#[derive(Debug, Default, Clone)]
pub struct DeleteDirectory;

impl DeleteDirectory {
    /// Create a new directory deletion
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mutator for DeleteDirectory {
    fn label(&self) -> &str {
        "DeleteDirectory"
    }

    fn description(&self) -> String {
        "Delete the target directory tree".into()
    }

    fn abort_on_failure_default(&self) -> bool {
        false
    }

    async fn mutate(&self, target: &Path, _context: &TransformContext) -> Result<MutationResult> {
        if !target.exists() {
            return Ok(MutationResult::no_op(format!(
                "'{}' is not present",
                target.display()
            )));
        }
        if !target.is_dir() {
            return Ok(MutationResult::error(format!(
                "'{}' is not a directory",
                target.display()
            )));
        }
        tokio::fs::remove_dir_all(target).await?;
        log::debug!("DeleteDirectory: removed '{}'", target.display());
        Ok(MutationResult::success(format!(
            "deleted '{}'",
            target.display()
        )))
    }
}
