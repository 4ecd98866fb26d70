//! Delete File Mutation
//!
//! Removes the target file. An absent target is a no-op, not an error,
//! and a failed deletion does not abort the run by default.

use std::path::Path;

use async_trait::async_trait;
use transform_engine::{MutationResult, Mutator, Result, TransformContext};

/// Delete the target file
#[derive(Debug, Default, Clone)]
pub struct DeleteFile;

impl DeleteFile {
    /// Create a new file deletion
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mutator for DeleteFile {
    fn label(&self) -> &str {
        "DeleteFile"
    }

    fn description(&self) -> String {
        "Delete the target file".into()
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
        if target.is_dir() {
            return Ok(MutationResult::error(format!(
                "'{}' is a directory",
                target.display()
            )));
        }
        tokio::fs::remove_file(target).await?;
        log::debug!("DeleteFile: removed '{}'", target.display());
        Ok(MutationResult::success(format!(
            "deleted '{}'",
            target.display()
        )))
    }
}
